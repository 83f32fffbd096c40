use crate::github::client::{after_argument, next_cursor, PAGE_SIZE};
use crate::github::FetchContext;
use crate::model::{Dataset, ProjectItem, Result};
use indexmap::IndexMap;
use serde_json::Value;

const NAME: &str = "Project";
const STATUS_FIELD: &str = "Status";

/// Board items of the configured organization project. A negative project
/// number is the "no board" sentinel: the section stays empty and no
/// request is sent.
pub(crate) async fn fetch(ctx: &FetchContext<'_>, data: &mut Dataset) -> Result<()> {
    if ctx.project_number < 0 {
        return Ok(());
    }
    let mut items = IndexMap::new();
    let mut cursor: Option<String> = None;
    loop {
        let query = project_query(ctx.owner, ctx.project_number, &cursor);
        let body = ctx.client.graphql(&query, NAME).await?;
        match parse_items_page(&body, &mut items) {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }
    data.add_project_items(items);
    Ok(())
}

fn project_query(owner: &str, project_number: i64, cursor: &Option<String>) -> String {
    let after = after_argument(cursor);
    format!(
        r#"{{
  organization(login: "{owner}") {{
    projectV2(number: {project_number}) {{
      title
      items(first: {PAGE_SIZE}{after}) {{
        nodes {{
          content {{
            __typename
            ... on Issue {{
              title
              id
              assignees(first: 1) {{ nodes {{ login }} }}
            }}
            ... on DraftIssue {{
              title
              id
              assignees(first: 1) {{ nodes {{ login }} }}
            }}
          }}
          fieldValues(first: 10) {{
            nodes {{
              ... on ProjectV2ItemFieldSingleSelectValue {{
                field {{ ... on ProjectV2FieldCommon {{ name }} }}
                name
              }}
            }}
          }}
        }}
        pageInfo {{ hasNextPage endCursor }}
      }}
    }}
  }}
}}"#
    )
}

fn parse_items_page(body: &Value, items: &mut IndexMap<String, ProjectItem>) -> Option<String> {
    let section = &body["data"]["organization"]["projectV2"]["items"];
    let nodes = section["nodes"].as_array()?;
    for node in nodes {
        let content = &node["content"];
        let Some(id) = content["id"].as_str() else {
            continue;
        };
        let title = content["title"].as_str().map(String::from);
        let assignee = content["assignees"]["nodes"]
            .as_array()
            .and_then(|nodes| nodes.first())
            .and_then(|node| node["login"].as_str())
            .map(String::from);
        let mut status = None;
        if let Some(field_values) = node["fieldValues"]["nodes"].as_array() {
            for field_value in field_values {
                if field_value["field"]["name"].as_str() == Some(STATUS_FIELD) {
                    status = field_value["name"].as_str().map(String::from);
                }
            }
        }
        items.insert(id.to_string(), ProjectItem::new(title, assignee, status));
    }
    next_cursor(&section["pageInfo"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::{FetchContext, GithubClient};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[tokio::test]
    async fn negative_project_number_skips_the_fetch() {
        let client = GithubClient::new("unused");
        let ctx = FetchContext {
            client: &client,
            owner: "acme",
            project_number: -1,
            excluded_commit_authors: &[],
        };
        let mut data = Dataset::default();
        fetch(&ctx, &mut data).await.unwrap();
        assert!(data.project.is_empty());
    }

    #[test]
    fn extracts_board_items_with_status() {
        let body = json!({
            "data": { "organization": { "projectV2": { "items": {
                "nodes": [{
                    "content": {
                        "__typename": "Issue",
                        "title": "Fix login",
                        "id": "ITEM_1",
                        "assignees": { "nodes": [{ "login": "anna" }] }
                    },
                    "fieldValues": { "nodes": [
                        {},
                        { "field": { "name": "Status" }, "name": "In Progress" }
                    ]}
                }],
                "pageInfo": { "hasNextPage": false, "endCursor": null }
            }}}}
        });
        let mut items = IndexMap::new();
        assert_eq!(parse_items_page(&body, &mut items), None);

        let item = &items["ITEM_1"];
        assert_eq!(item.title, Some("Fix login".to_string()));
        assert_eq!(item.assignee, Some("anna".to_string()));
        assert_eq!(item.status, Some("In Progress".to_string()));
        assert_eq!(item.item_type, None);
    }

    #[test]
    fn items_without_content_id_are_dropped() {
        let body = json!({
            "data": { "organization": { "projectV2": { "items": {
                "nodes": [{ "content": {}, "fieldValues": { "nodes": [] } }],
                "pageInfo": { "hasNextPage": false, "endCursor": null }
            }}}}
        });
        let mut items = IndexMap::new();
        parse_items_page(&body, &mut items);
        assert!(items.is_empty());
    }
}
