use crate::github::FetchContext;
use crate::model::{Dataset, Result};
use indexmap::IndexMap;
use serde_json::Value;

pub(crate) async fn members(ctx: &FetchContext<'_>, data: &mut Dataset) -> Result<()> {
    let value = ctx
        .client
        .rest_get(&format!("/orgs/{}/members", ctx.owner), "Members")
        .await?;
    let (logins, images) = parse_accounts(&value);
    data.add_members(logins, images);
    Ok(())
}

pub(crate) async fn collaborators(
    ctx: &FetchContext<'_>,
    repo: &str,
    data: &mut Dataset,
) -> Result<()> {
    let value = ctx
        .client
        .rest_get(
            &format!("/repos/{}/{repo}/collaborators", ctx.owner),
            "Collaborators",
        )
        .await?;
    let (logins, images) = parse_accounts(&value);
    data.add_members(logins, images);
    Ok(())
}

pub(crate) async fn org_repos(ctx: &FetchContext<'_>, data: &mut Dataset) -> Result<()> {
    let value = ctx
        .client
        .rest_get(&format!("/orgs/{}/repos", ctx.owner), "OrgRepos")
        .await?;
    let Some(list) = value.as_array() else {
        return Ok(());
    };
    let repos = list
        .iter()
        .filter_map(|repo| repo["name"].as_str().map(String::from))
        .collect();
    data.add_repos(repos);
    Ok(())
}

fn parse_accounts(value: &Value) -> (Vec<String>, IndexMap<String, String>) {
    let mut logins = Vec::new();
    let mut images = IndexMap::new();
    let Some(list) = value.as_array() else {
        return (logins, images);
    };
    for account in list {
        let Some(login) = account["login"].as_str() else {
            continue;
        };
        logins.push(login.to_string());
        if let Some(avatar_url) = account["avatar_url"].as_str() {
            images.insert(login.to_string(), avatar_url.to_string());
        }
    }
    (logins, images)
}
