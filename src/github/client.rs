use crate::model::{MetricsError, Result};
use serde_json::{json, Value};

const API_ROOT: &str = "https://api.github.com";
const GRAPHQL_URL: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = "activity-metrics";

pub const PAGE_SIZE: usize = 100;

/// Thin transport over the REST and GraphQL endpoints. Any non-success
/// status aborts the calling fetcher with a transport error naming it.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    token: String,
}

impl GithubClient {
    pub fn new(token: impl ToString) -> Self {
        Self {
            http: reqwest::Client::new(),
            token: token.to_string(),
        }
    }

    pub async fn rest_get(&self, path: &str, fetcher: &'static str) -> Result<Value> {
        let response = self
            .http
            .get(format!("{API_ROOT}{path}"))
            .header("Authorization", format!("token {}", self.token))
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MetricsError::Transport {
                fetcher,
                status: response.status().as_u16(),
            }
            .into());
        }
        Ok(response.json().await?)
    }

    pub async fn graphql(&self, query: &str, fetcher: &'static str) -> Result<Value> {
        let response = self
            .http
            .post(GRAPHQL_URL)
            .header("Authorization", format!("token {}", self.token))
            .header("User-Agent", USER_AGENT)
            .json(&json!({ "query": query }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(MetricsError::Transport {
                fetcher,
                status: response.status().as_u16(),
            }
            .into());
        }
        Ok(response.json().await?)
    }
}

/// Renders the `after:` argument for a cursor-paginated query.
pub fn after_argument(cursor: &Option<String>) -> String {
    match cursor {
        Some(cursor) => format!(r#", after: "{cursor}""#),
        None => String::new(),
    }
}

/// Reads `hasNextPage`/`endCursor` out of a `pageInfo` node; `None` means
/// the walk is complete.
pub fn next_cursor(page_info: &Value) -> Option<String> {
    if page_info["hasNextPage"].as_bool() == Some(true) {
        page_info["endCursor"].as_str().map(String::from)
    } else {
        None
    }
}
