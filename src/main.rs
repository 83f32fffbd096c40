mod collect;
mod github;
mod model;
mod store;
mod utils;

use crate::collect::{Collector, Metrics};
use crate::github::{FetchContext, Fetcher, GithubClient};
use crate::model::{Config, Credentials, Dataset, MembersSource, MetricsScope, Result};
use crate::store::{HISTORIC_PATH, METRICS_PATH};
use crate::utils::MultiProgressNew;
use chrono::{Duration, Utc};
use clap::Parser;
use futures::stream::{self, StreamExt};
use indicatif::MultiProgress;

const CONFIG_PATH: &str = "config.json";
const ENV_PATH: &str = "env.json";
const MAX_PARALLEL_REPOS: usize = 4;

#[derive(Parser, Debug, Clone)]
struct Args {
    /// `daily` archives the snapshot into the historic store after
    /// computing it; any other value (or none) writes the snapshot only.
    mode: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    if args.mode.as_deref() == Some("daily") {
        daily_metrics().await
    } else {
        get_metrics().await.map(|_| ())
    }
}

async fn get_metrics() -> Result<Metrics> {
    let config = Config::from_file(CONFIG_PATH)?;
    let credentials = Credentials::from_env(ENV_PATH)?;
    let mut metrics = store::load_document(METRICS_PATH).unwrap_or_default();

    let repo_client = GithubClient::new(&credentials.repo_token);
    let org_client = GithubClient::new(&credentials.org_token);
    let client = match (config.metrics_scope, config.members) {
        (MetricsScope::Org, _) => &org_client,
        (MetricsScope::Repo, MembersSource::Repo) => &repo_client,
        (MetricsScope::Repo, _) => &org_client,
    };
    let ctx = FetchContext::new(client, &credentials.owner, &config);

    let multi_progress = MultiProgress::default();
    let mut data = Dataset::default();
    let mut repo_fetchers = Fetcher::repo_registry();

    let repos = match config.metrics_scope {
        MetricsScope::Org => {
            let pb = multi_progress.add_spinner();
            pb.set_message("Listing organization repositories and members ...");
            let (repos_part, members_part) = futures::join!(
                run_fetcher(Fetcher::OrgRepos, &ctx, ""),
                run_fetcher(Fetcher::Members, &ctx, ""),
            );
            data.merge(repos_part?);
            data.merge(members_part?);
            pb.finish_with_message(format!(
                "✅ Found {} repositories and {} members",
                data.repos.len(),
                data.members.len()
            ));
            if config.members == MembersSource::Both {
                repo_fetchers.push(Fetcher::Collaborators);
            }
            data.repo_list(&config.excluded_repos)
        }
        MetricsScope::Repo => {
            match config.members {
                MembersSource::Org => {
                    let members_part = run_fetcher(Fetcher::Members, &ctx, "").await?;
                    data.merge(members_part);
                }
                MembersSource::Repo => {
                    repo_fetchers.push(Fetcher::Collaborators);
                }
                MembersSource::Both => {
                    let members_part = run_fetcher(Fetcher::Members, &ctx, "").await?;
                    data.merge(members_part);
                    repo_fetchers.push(Fetcher::Collaborators);
                }
            }
            vec![credentials.repo.clone()]
        }
    };

    let mut repo_tasks = stream::iter(
        repos
            .iter()
            .map(|repo| fetch_repo(repo, &repo_fetchers, &ctx, &multi_progress)),
    )
    .buffer_unordered(MAX_PARALLEL_REPOS);
    // The only point of shared mutable state: partials land here one at a
    // time, in completion order.
    while let Some(partial) = repo_tasks.next().await {
        data.merge(partial?);
    }
    drop(repo_tasks);

    let members = data.member_roster(&config.excluded_members);
    for collector in Collector::registry() {
        collector.execute(&data, &mut metrics, &members)?;
    }
    store::write_document(METRICS_PATH, &metrics)?;
    Ok(metrics)
}

async fn daily_metrics() -> Result<()> {
    let metrics = match store::load_document(METRICS_PATH) {
        Some(metrics) => metrics,
        None => get_metrics().await?,
    };
    let mut historic = store::load_document(HISTORIC_PATH).unwrap_or_default();
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    store::archive_snapshot(&mut historic, yesterday, metrics);
    store::write_document(HISTORIC_PATH, &historic)
}

async fn run_fetcher(fetcher: Fetcher, ctx: &FetchContext<'_>, repo: &str) -> Result<Dataset> {
    let mut partial = Dataset::default();
    fetcher.execute(ctx, repo, &mut partial).await?;
    Ok(partial)
}

async fn fetch_repo(
    repo: &str,
    fetchers: &[Fetcher],
    ctx: &FetchContext<'_>,
    multi_progress: &MultiProgress,
) -> Result<Dataset> {
    let pb = multi_progress.add_spinner();
    let mut partial = Dataset::default();
    // Pagination inside one fetcher is cursor-driven, so fetchers run
    // sequentially within a repository task.
    for fetcher in fetchers {
        pb.set_message(format!("{repo}: fetching {} ...", fetcher.name()));
        fetcher.execute(ctx, repo, &mut partial).await?;
    }
    pb.finish_with_message(format!(
        "✅ {repo}: {} commits, {} issues, {} pull requests",
        partial.commits.len(),
        partial.issues.len(),
        partial.pull_requests.len()
    ));
    Ok(partial)
}
