use crate::github::{commits, issues, org, project, pull_requests, GithubClient};
use crate::model::{Config, Dataset, Result};

/// Everything a fetcher needs besides the repository it targets.
pub struct FetchContext<'a> {
    pub client: &'a GithubClient,
    pub owner: &'a str,
    pub project_number: i64,
    pub excluded_commit_authors: &'a [String],
}

impl<'a> FetchContext<'a> {
    pub fn new(client: &'a GithubClient, owner: &'a str, config: &'a Config) -> Self {
        Self {
            client,
            owner,
            project_number: config.project_number,
            excluded_commit_authors: &config.excluded_commit_authors,
        }
    }
}

/// Static registry of data sources. Each variant paginates one remote
/// category in full and merges it into the partial dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetcher {
    Commits,
    Issues,
    PullRequests,
    Project,
    Members,
    OrgRepos,
    Collaborators,
}

impl Fetcher {
    /// The per-repository registry, applied to every selected repository.
    pub fn repo_registry() -> Vec<Fetcher> {
        vec![
            Fetcher::Commits,
            Fetcher::Issues,
            Fetcher::PullRequests,
            Fetcher::Project,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Fetcher::Commits => "Commits",
            Fetcher::Issues => "Issues",
            Fetcher::PullRequests => "PullRequests",
            Fetcher::Project => "Project",
            Fetcher::Members => "Members",
            Fetcher::OrgRepos => "OrgRepos",
            Fetcher::Collaborators => "Collaborators",
        }
    }

    pub async fn execute(
        &self,
        ctx: &FetchContext<'_>,
        repo: &str,
        data: &mut Dataset,
    ) -> Result<()> {
        match self {
            Fetcher::Commits => commits::fetch(ctx, repo, data).await,
            Fetcher::Issues => issues::fetch(ctx, repo, data).await,
            Fetcher::PullRequests => pull_requests::fetch(ctx, repo, data).await,
            Fetcher::Project => project::fetch(ctx, data).await,
            Fetcher::Members => org::members(ctx, data).await,
            Fetcher::OrgRepos => org::org_repos(ctx, data).await,
            Fetcher::Collaborators => org::collaborators(ctx, repo, data).await,
        }
    }
}
