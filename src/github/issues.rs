use crate::github::client::{after_argument, next_cursor, PAGE_SIZE};
use crate::github::FetchContext;
use crate::model::{Dataset, Issue, IssueState, Result};
use indexmap::IndexMap;
use serde_json::Value;

const NAME: &str = "Issues";

pub(crate) async fn fetch(ctx: &FetchContext<'_>, repo: &str, data: &mut Dataset) -> Result<()> {
    let mut issues = IndexMap::new();
    let mut cursor: Option<String> = None;
    loop {
        let query = issues_query(ctx.owner, repo, &cursor);
        let body = ctx.client.graphql(&query, NAME).await?;
        match parse_issues_page(&body, &mut issues) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    data.add_issues(issues);
    Ok(())
}

fn issues_query(owner: &str, repo: &str, cursor: &Option<String>) -> String {
    let after = after_argument(cursor);
    format!(
        r#"{{
  repository(owner: "{owner}", name: "{repo}") {{
    issues(first: {PAGE_SIZE}{after}) {{
      nodes {{
        id
        state
        assignees(first: 1) {{ nodes {{ login }} }}
        closedByPullRequestsReferences(first: 1) {{
          totalCount
          nodes {{ author {{ login }} }}
        }}
      }}
      pageInfo {{ hasNextPage endCursor }}
    }}
  }}
}}"#
    )
}

fn parse_issues_page(body: &Value, issues: &mut IndexMap<String, Issue>) -> Option<String> {
    let section = &body["data"]["repository"]["issues"];
    let nodes = section["nodes"].as_array()?;
    for node in nodes {
        let Some(id) = node["id"].as_str() else {
            continue;
        };
        let state = IssueState::from_api(node["state"].as_str().unwrap_or("OPEN"));
        let assignee = node["assignees"]["nodes"]
            .as_array()
            .and_then(|nodes| nodes.first())
            .and_then(|node| node["login"].as_str())
            .map(String::from);
        let closing_refs = &node["closedByPullRequestsReferences"];
        let has_pull_request = closing_refs["totalCount"].as_u64().unwrap_or(0) > 0;
        let pr_author_is_assignee = if has_pull_request {
            let pr_author = closing_refs["nodes"]
                .as_array()
                .and_then(|nodes| nodes.first())
                .and_then(|node| node["author"]["login"].as_str())
                .map(String::from);
            Some(pr_author == assignee)
        } else {
            None
        };
        issues.insert(
            id.to_string(),
            Issue::new(state, assignee, has_pull_request, pr_author_is_assignee),
        );
    }
    next_cursor(&section["pageInfo"])
}
