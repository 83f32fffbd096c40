use crate::github::client::{after_argument, next_cursor, PAGE_SIZE};
use crate::github::FetchContext;
use crate::model::{Commit, Dataset, Result, ANONYMOUS_AUTHOR};
use chrono::DateTime;
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use serde_json::Value;

const NAME: &str = "Commits";
const MAX_PARALLEL_BRANCHES: usize = 4;

/// Walks the full history of every branch. Shared history across branches
/// re-inserts the same commit id with identical content, which the merge
/// keeps idempotent.
pub(crate) async fn fetch(ctx: &FetchContext<'_>, repo: &str, data: &mut Dataset) -> Result<()> {
    let branches = branches(ctx, repo).await?;

    let mut walks = stream::iter(
        branches
            .iter()
            .map(|branch| branch_history(ctx, repo, branch)),
    )
    .buffer_unordered(MAX_PARALLEL_BRANCHES);

    let mut commits = IndexMap::new();
    while let Some(branch_commits) = walks.next().await {
        commits.extend(branch_commits?);
    }
    data.add_commits(commits);
    Ok(())
}

async fn branches(ctx: &FetchContext<'_>, repo: &str) -> Result<Vec<String>> {
    let value = ctx
        .client
        .rest_get(&format!("/repos/{}/{repo}/branches", ctx.owner), NAME)
        .await?;
    let Some(list) = value.as_array() else {
        return Ok(vec![]);
    };
    Ok(list
        .iter()
        .filter_map(|branch| branch["name"].as_str().map(String::from))
        .collect())
}

async fn branch_history(
    ctx: &FetchContext<'_>,
    repo: &str,
    branch: &str,
) -> Result<IndexMap<String, Commit>> {
    let mut commits = IndexMap::new();
    let mut cursor: Option<String> = None;
    loop {
        let query = history_query(ctx.owner, repo, branch, &cursor);
        let body = ctx.client.graphql(&query, NAME).await?;
        match parse_history_page(&body, ctx.excluded_commit_authors, &mut commits)? {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    Ok(commits)
}

fn history_query(owner: &str, repo: &str, branch: &str, cursor: &Option<String>) -> String {
    let after = after_argument(cursor);
    format!(
        r#"{{
  repository(owner: "{owner}", name: "{repo}") {{
    ref(qualifiedName: "refs/heads/{branch}") {{
      target {{
        ... on Commit {{
          history(first: {PAGE_SIZE}{after}) {{
            edges {{
              node {{
                oid
                author {{ user {{ login }} }}
                additions
                deletions
                committedDate
                parents(first: 1) {{ totalCount }}
              }}
            }}
            pageInfo {{ hasNextPage endCursor }}
          }}
        }}
      }}
    }}
  }}
}}"#
    )
}

fn parse_history_page(
    body: &Value,
    excluded_authors: &[String],
    commits: &mut IndexMap<String, Commit>,
) -> Result<Option<String>> {
    let history = &body["data"]["repository"]["ref"]["target"]["history"];
    let Some(edges) = history["edges"].as_array() else {
        return Ok(None);
    };
    for edge in edges {
        let node = &edge["node"];
        let Some(sha) = node["oid"].as_str() else {
            continue;
        };
        let login = node["author"]["user"]["login"].as_str();
        if let Some(login) = login {
            if excluded_authors.iter().any(|a| a.as_str() == login) {
                continue;
            }
        }
        let Some(date_str) = node["committedDate"].as_str() else {
            continue;
        };
        let Ok(datetime) = DateTime::parse_from_rfc3339(date_str) else {
            return Err(format!("not a valid commit date: {date_str}").into());
        };
        let commit = Commit::new(
            login.unwrap_or(ANONYMOUS_AUTHOR),
            node["additions"].as_u64().unwrap_or(0),
            node["deletions"].as_u64().unwrap_or(0),
            datetime.date_naive(),
            node["parents"]["totalCount"].as_i64().unwrap_or(0) > 1,
        );
        commits.insert(sha.to_string(), commit);
    }
    Ok(next_cursor(&history["pageInfo"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn history_body(edges: Value, has_next: bool) -> Value {
        json!({
            "data": { "repository": { "ref": { "target": { "history": {
                "edges": edges,
                "pageInfo": { "hasNextPage": has_next, "endCursor": "cur-1" }
            }}}}}
        })
    }

    fn commit_node(sha: &str, login: Option<&str>, parents: u64) -> Value {
        json!({ "node": {
            "oid": sha,
            "author": { "user": login.map(|l| json!({ "login": l })) },
            "additions": 4,
            "deletions": 2,
            "committedDate": "2024-05-03T11:22:33Z",
            "parents": { "totalCount": parents }
        }})
    }

    #[test]
    fn extracts_commits_and_reports_the_next_cursor() {
        let body = history_body(json!([commit_node("sha-1", Some("anna"), 1)]), true);
        let mut commits = IndexMap::new();
        let cursor = parse_history_page(&body, &[], &mut commits).unwrap();

        assert_eq!(cursor, Some("cur-1".to_string()));
        let commit = &commits["sha-1"];
        assert_eq!(commit.author, "anna");
        assert_eq!(commit.modified, 6);
        assert_eq!(commit.date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
        assert!(!commit.merge);
    }

    #[test]
    fn last_page_yields_no_cursor() {
        let body = history_body(json!([]), false);
        let mut commits = IndexMap::new();
        assert_eq!(parse_history_page(&body, &[], &mut commits).unwrap(), None);
    }

    #[test]
    fn unmapped_author_becomes_anonymous() {
        let body = history_body(json!([commit_node("sha-2", None, 1)]), false);
        let mut commits = IndexMap::new();
        parse_history_page(&body, &[], &mut commits).unwrap();
        assert_eq!(commits["sha-2"].author, ANONYMOUS_AUTHOR);
    }

    #[test]
    fn excluded_authors_are_skipped() {
        let body = history_body(
            json!([commit_node("sha-3", Some("github-actions[bot]"), 1)]),
            false,
        );
        let mut commits = IndexMap::new();
        parse_history_page(&body, &["github-actions[bot]".to_string()], &mut commits).unwrap();
        assert!(commits.is_empty());
    }

    #[test]
    fn more_than_one_parent_marks_a_merge() {
        let body = history_body(json!([commit_node("sha-4", Some("anna"), 2)]), false);
        let mut commits = IndexMap::new();
        parse_history_page(&body, &[], &mut commits).unwrap();
        assert!(commits["sha-4"].merge);
    }

    #[test]
    fn missing_data_section_stops_the_walk() {
        let body = json!({ "errors": [{ "message": "boom" }] });
        let mut commits = IndexMap::new();
        assert_eq!(parse_history_page(&body, &[], &mut commits).unwrap(), None);
        assert!(commits.is_empty());
    }
}
