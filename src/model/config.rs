use crate::model::{MetricsError, Result};
use serde_json::{from_str, Value};
use std::env;
use std::fs;
use std::path::Path;

const DEFAULT_PROJECT_NUMBER: i64 = -1;
const DEFAULT_EXCLUDED_COMMIT_AUTHORS: &[&str] = &["github-actions[bot]"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricsScope {
    Org,
    Repo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembersSource {
    Org,
    Repo,
    Both,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub metrics_scope: MetricsScope,
    pub members: MembersSource,
    pub excluded_members: Vec<String>,
    pub excluded_repos: Vec<String>,
    pub project_number: i64,
    pub excluded_commit_authors: Vec<String>,
}

// Create
impl Config {
    pub fn from_file(path: &str) -> Result<Self> {
        let json_str = fs::read_to_string(path)
            .map_err(|_| MetricsError::Config(format!("config file `{path}` not found")))?;
        Self::parse(&json_str)
    }
}

// Parser
impl Config {
    fn parse(json_str: &str) -> Result<Self> {
        let value: Value = from_str(json_str)
            .map_err(|e| MetricsError::Config(format!("config is not valid JSON: {e}")))?;

        let metrics_scope = match required_str(&value, "metrics_scope")? {
            "org" => MetricsScope::Org,
            "repo" => MetricsScope::Repo,
            other => {
                return Err(MetricsError::Config(format!(
                    "field `metrics_scope` must be one of [\"org\", \"repo\"], got `{other}`"
                ))
                .into())
            }
        };
        let members = match required_str(&value, "members")? {
            "org" => MembersSource::Org,
            "repo" => MembersSource::Repo,
            "both" => MembersSource::Both,
            other => {
                return Err(MetricsError::Config(format!(
                    "field `members` must be one of [\"org\", \"repo\", \"both\"], got `{other}`"
                ))
                .into())
            }
        };
        let excluded_members = required_string_list(&value, "excluded_members")?;
        let excluded_repos = required_string_list(&value, "excluded_repos")?;
        let project_number = match value.get("project_number") {
            None => DEFAULT_PROJECT_NUMBER,
            Some(number) => number.as_i64().ok_or_else(|| {
                MetricsError::Config("field `project_number` must be an integer".to_string())
            })?,
        };
        let excluded_commit_authors = match value.get("excluded_commit_authors") {
            None => DEFAULT_EXCLUDED_COMMIT_AUTHORS
                .iter()
                .map(|a| a.to_string())
                .collect(),
            Some(_) => required_string_list(&value, "excluded_commit_authors")?,
        };

        Ok(Self {
            metrics_scope,
            members,
            excluded_members,
            excluded_repos,
            project_number,
            excluded_commit_authors,
        })
    }
}

fn required_str<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    match value.get(field) {
        None => Err(MetricsError::Config(format!("missing required field `{field}`")).into()),
        Some(v) => v.as_str().ok_or_else(|| {
            MetricsError::Config(format!("field `{field}` must be a string")).into()
        }),
    }
}

fn required_string_list(value: &Value, field: &str) -> Result<Vec<String>> {
    match value.get(field) {
        None => Err(MetricsError::Config(format!("missing required field `{field}`")).into()),
        Some(v) => match v.as_array() {
            None => {
                Err(MetricsError::Config(format!("field `{field}` must be a list")).into())
            }
            Some(items) => Ok(items
                .iter()
                .filter_map(|item| item.as_str().map(String::from))
                .collect()),
        },
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub repo_token: String,
    pub org_token: String,
    pub owner: String,
    pub repo: String,
}

impl Credentials {
    /// Resolves tokens and the target repository from the environment,
    /// loading `env_path` into the environment first when it exists.
    pub fn from_env(env_path: &str) -> Result<Self> {
        load_env_file(env_path)?;
        let repo_token = required_env("GITHUB_TOKEN")?;
        let org_token = required_env("ORG_TOKEN")?;
        let repository = required_env("GITHUB_REPOSITORY")?;
        let Some((owner, repo)) = repository.split_once('/') else {
            return Err(MetricsError::Config(
                "environment variable `GITHUB_REPOSITORY` must look like `owner/name`".to_string(),
            )
            .into());
        };
        Ok(Self {
            repo_token,
            org_token,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

fn load_env_file(path: &str) -> Result<()> {
    if !Path::new(path).exists() {
        return Ok(());
    }
    let json_str = fs::read_to_string(path)?;
    let variables: Value = from_str(&json_str)
        .map_err(|e| MetricsError::Config(format!("`{path}` is not valid JSON: {e}")))?;
    let Some(variables) = variables.as_object() else {
        return Err(MetricsError::Config(format!("`{path}` must be a JSON object")).into());
    };
    for (key, value) in variables {
        if let Some(value) = value.as_str() {
            env::set_var(key, value);
        }
    }
    Ok(())
}

fn required_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) => Ok(value.trim().to_string()),
        Err(_) => {
            Err(MetricsError::Config(format!("environment variable `{name}` is not set")).into())
        }
    }
}
