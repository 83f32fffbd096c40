pub mod client;
mod commits;
mod fetcher;
mod issues;
mod org;
mod project;
mod pull_requests;

pub use client::GithubClient;
pub use fetcher::{FetchContext, Fetcher};
