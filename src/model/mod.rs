mod config;
mod dataset;
mod result;

pub use config::{Config, Credentials, MembersSource, MetricsScope};
pub use dataset::{Commit, Dataset, Issue, IssueState, ProjectItem, PullRequest, ANONYMOUS_AUTHOR};
pub use result::{MetricsError, Result};
