mod avatars;
mod commits;
mod issues;
mod project;
mod pull_requests;

use crate::model::{Dataset, Result};
use indexmap::IndexMap;
use serde_json::Value;

/// The metrics document: one entry per metric section, persisted as-is.
pub type Metrics = IndexMap<String, Value>;

/// Static registry of metric reducers. Each writes its own section of the
/// metrics document; none reads another's output within a run, except that
/// the commits collector consults the previously persisted longest-streak
/// section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collector {
    Commits,
    Issues,
    PullRequests,
    Project,
    Avatars,
}

impl Collector {
    pub fn registry() -> Vec<Collector> {
        vec![
            Collector::Commits,
            Collector::Issues,
            Collector::PullRequests,
            Collector::Project,
            Collector::Avatars,
        ]
    }

    pub fn execute(&self, data: &Dataset, metrics: &mut Metrics, members: &[String]) -> Result<()> {
        match self {
            Collector::Commits => commits::execute(data, metrics, members),
            Collector::Issues => issues::execute(data, metrics, members),
            Collector::PullRequests => pull_requests::execute(data, metrics, members),
            Collector::Project => project::execute(data, metrics, members),
            Collector::Avatars => avatars::execute(data, metrics, members),
        }
    }
}
