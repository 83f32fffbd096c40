use chrono::NaiveDate;
use indexmap::IndexMap;
use itertools::Itertools;

pub const ANONYMOUS_AUTHOR: &str = "anonymous";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub author: String,
    pub additions: u64,
    pub deletions: u64,
    pub modified: u64,
    pub date: NaiveDate,
    pub merge: bool,
}

impl Commit {
    pub fn new(
        author: impl ToString,
        additions: u64,
        deletions: u64,
        date: NaiveDate,
        merge: bool,
    ) -> Self {
        Self {
            author: author.to_string(),
            additions,
            deletions,
            modified: additions + deletions,
            date,
            merge,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn from_api(state: &str) -> Self {
        match state {
            "CLOSED" => IssueState::Closed,
            _ => IssueState::Open,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub state: IssueState,
    pub assignee: Option<String>,
    pub has_pull_request: bool,
    pub pr_author_is_assignee: Option<bool>,
}

impl Issue {
    pub fn new(
        state: IssueState,
        assignee: Option<String>,
        has_pull_request: bool,
        pr_author_is_assignee: Option<bool>,
    ) -> Self {
        Self {
            state,
            assignee,
            has_pull_request,
            // Only meaningful when a closing pull request exists.
            pr_author_is_assignee: if has_pull_request {
                pr_author_is_assignee
            } else {
                None
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub state: String,
    pub author: String,
    pub merged: bool,
    pub merged_by: Option<String>,
}

impl PullRequest {
    pub fn new(
        state: impl ToString,
        author: impl ToString,
        merged: bool,
        merged_by: Option<String>,
    ) -> Self {
        Self {
            state: state.to_string(),
            author: author.to_string(),
            merged,
            merged_by: if merged { merged_by } else { None },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub title: Option<String>,
    pub assignee: Option<String>,
    pub status: Option<String>,
    // Never populated by the board API extraction; kept as a field so the
    // section shape stays stable.
    pub item_type: Option<String>,
}

impl ProjectItem {
    pub fn new(title: Option<String>, assignee: Option<String>, status: Option<String>) -> Self {
        Self {
            title,
            assignee,
            status,
            item_type: None,
        }
    }
}

/// All sections fetched during one run. Sections keyed by a stable remote
/// id merge by key-wise union, list sections concatenate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub commits: IndexMap<String, Commit>,
    pub issues: IndexMap<String, Issue>,
    pub pull_requests: IndexMap<String, PullRequest>,
    pub project: IndexMap<String, ProjectItem>,
    pub members: Vec<String>,
    pub members_images: IndexMap<String, String>,
    pub repos: Vec<String>,
}

// Merge protocol
impl Dataset {
    pub fn merge(&mut self, other: Dataset) {
        self.commits.extend(other.commits);
        self.issues.extend(other.issues);
        self.pull_requests.extend(other.pull_requests);
        self.project.extend(other.project);
        self.members.extend(other.members);
        self.members_images.extend(other.members_images);
        self.repos.extend(other.repos);
    }

    pub fn add_commits(&mut self, commits: IndexMap<String, Commit>) {
        self.commits.extend(commits);
    }

    pub fn add_issues(&mut self, issues: IndexMap<String, Issue>) {
        self.issues.extend(issues);
    }

    pub fn add_pull_requests(&mut self, pull_requests: IndexMap<String, PullRequest>) {
        self.pull_requests.extend(pull_requests);
    }

    pub fn add_project_items(&mut self, items: IndexMap<String, ProjectItem>) {
        self.project.extend(items);
    }

    pub fn add_members(&mut self, logins: Vec<String>, images: IndexMap<String, String>) {
        self.members.extend(logins);
        self.members_images.extend(images);
    }

    pub fn add_repos(&mut self, repos: Vec<String>) {
        self.repos.extend(repos);
    }
}

// Derived views
impl Dataset {
    /// Distinct member logins minus the exclusion list, in first-seen order.
    pub fn member_roster(&self, excluded: &[String]) -> Vec<String> {
        self.members
            .iter()
            .unique()
            .filter(|login| !excluded.contains(login))
            .cloned()
            .collect()
    }

    pub fn repo_list(&self, excluded: &[String]) -> Vec<String> {
        self.repos
            .iter()
            .unique()
            .filter(|repo| !excluded.contains(repo))
            .cloned()
            .collect()
    }
}
