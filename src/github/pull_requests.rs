use crate::github::client::{after_argument, next_cursor, PAGE_SIZE};
use crate::github::FetchContext;
use crate::model::{Dataset, PullRequest, Result};
use indexmap::IndexMap;
use serde_json::Value;

const NAME: &str = "PullRequests";

// Login GitHub reports for accounts that no longer exist.
const DELETED_AUTHOR: &str = "ghost";

pub(crate) async fn fetch(ctx: &FetchContext<'_>, repo: &str, data: &mut Dataset) -> Result<()> {
    let mut pull_requests = IndexMap::new();
    let mut cursor: Option<String> = None;
    loop {
        let query = pull_requests_query(ctx.owner, repo, &cursor);
        let body = ctx.client.graphql(&query, NAME).await?;
        match parse_pull_requests_page(&body, &mut pull_requests) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    data.add_pull_requests(pull_requests);
    Ok(())
}

fn pull_requests_query(owner: &str, repo: &str, cursor: &Option<String>) -> String {
    let after = after_argument(cursor);
    format!(
        r#"{{
  repository(owner: "{owner}", name: "{repo}") {{
    pullRequests(first: {PAGE_SIZE}{after}) {{
      nodes {{
        id
        author {{ login }}
        state
        merged
        mergedBy {{ login }}
      }}
      pageInfo {{ hasNextPage endCursor }}
    }}
  }}
}}"#
    )
}

fn parse_pull_requests_page(
    body: &Value,
    pull_requests: &mut IndexMap<String, PullRequest>,
) -> Option<String> {
    let section = &body["data"]["repository"]["pullRequests"];
    let nodes = section["nodes"].as_array()?;
    for node in nodes {
        let Some(id) = node["id"].as_str() else {
            continue;
        };
        let author = node["author"]["login"].as_str().unwrap_or(DELETED_AUTHOR);
        let state = node["state"].as_str().unwrap_or("OPEN");
        let merged = node["merged"].as_bool().unwrap_or(false);
        let merged_by = node["mergedBy"]["login"].as_str().map(String::from);
        pull_requests.insert(
            id.to_string(),
            PullRequest::new(state, author, merged, merged_by),
        );
    }
    next_cursor(&section["pageInfo"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn pull_requests_body(nodes: Value, has_next: bool) -> Value {
        json!({
            "data": { "repository": { "pullRequests": {
                "nodes": nodes,
                "pageInfo": { "hasNextPage": has_next, "endCursor": "cur-3" }
            }}}
        })
    }

    #[test]
    fn extracts_merged_pull_request() {
        let body = pull_requests_body(
            json!([{
                "id": "PR_1",
                "author": { "login": "anna" },
                "state": "MERGED",
                "merged": true,
                "mergedBy": { "login": "marc" }
            }]),
            false,
        );
        let mut pull_requests = IndexMap::new();
        assert_eq!(parse_pull_requests_page(&body, &mut pull_requests), None);

        let pr = &pull_requests["PR_1"];
        assert_eq!(pr.author, "anna");
        assert!(pr.merged);
        assert_eq!(pr.merged_by, Some("marc".to_string()));
    }

    #[test]
    fn open_pull_request_has_no_merger() {
        let body = pull_requests_body(
            json!([{
                "id": "PR_2",
                "author": { "login": "anna" },
                "state": "OPEN",
                "merged": false,
                "mergedBy": null
            }]),
            true,
        );
        let mut pull_requests = IndexMap::new();
        let cursor = parse_pull_requests_page(&body, &mut pull_requests);

        assert_eq!(cursor, Some("cur-3".to_string()));
        assert_eq!(pull_requests["PR_2"].merged_by, None);
    }
}
