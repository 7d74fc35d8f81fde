//! Profile aggregation: profile, first page of repositories, and a
//! per-repository contribution estimate fetched concurrently.

use crate::github::{ApiError, GithubClient};
use crate::model::{AggregateResult, Handle, Repository};
use log::{debug, info, warn};
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("user `{0}` not found")]
    ProfileNotFound(String),
    #[error("GitHub API error: {0}")]
    Upstream(#[source] ApiError),
}

pub struct ProfileAggregator {
    client: GithubClient,
}

impl ProfileAggregator {
    pub fn new(client: GithubClient) -> Self {
        Self { client }
    }

    pub async fn aggregate(&self, handle: &Handle) -> Result<AggregateResult, AggregateError> {
        info!("fetching profile for {handle}");
        let profile = self
            .client
            .fetch_profile(handle.as_str())
            .await
            .map_err(|err| match err.status() {
                Some(StatusCode::NOT_FOUND) => AggregateError::ProfileNotFound(handle.to_string()),
                _ => AggregateError::Upstream(err),
            })?;

        let listed = self
            .client
            .list_repositories(handle.as_str())
            .await
            .map_err(AggregateError::Upstream)?;

        let (owned, foreign): (Vec<Repository>, Vec<Repository>) =
            listed.into_iter().partition(|repo| handle.matches(&repo.owner));
        for repo in &foreign {
            debug!("skipping {}/{}: not owned by {handle}", repo.owner, repo.name);
        }

        let mut repositories = self.enrich(handle, owned).await;

        // Stable: equal estimates keep upstream order.
        repositories.sort_by(|a, b| b.contributions.cmp(&a.contributions));

        info!(
            "aggregated {} repositories for {}",
            repositories.len(),
            profile.login
        );

        Ok(AggregateResult {
            profile,
            repositories,
        })
    }

    /// Starts one commit lookup per repository and waits for all of them.
    /// A failed lookup leaves that repository at 0 and nothing else changes.
    async fn enrich(&self, handle: &Handle, repositories: Vec<Repository>) -> Vec<Repository> {
        let tasks: Vec<_> = repositories
            .iter()
            .map(|repo| {
                let client = self.client.clone();
                let owner = repo.owner.clone();
                let name = repo.name.clone();
                let author = handle.as_str().to_string();
                tokio::spawn(async move {
                    client.commit_count_estimate(&owner, &name, &author).await
                })
            })
            .collect();

        let mut enriched = Vec::with_capacity(repositories.len());
        for (mut repo, task) in repositories.into_iter().zip(tasks) {
            repo.contributions = match task.await {
                Ok(Ok(estimate)) => {
                    debug!("{}/{}: ~{estimate} commits", repo.owner, repo.name);
                    estimate
                }
                Ok(Err(err)) => {
                    warn!("no contribution count for {}/{}: {err}", repo.owner, repo.name);
                    0
                }
                Err(err) => {
                    warn!("contribution lookup for {}/{} aborted: {err}", repo.owner, repo.name);
                    0
                }
            };
            enriched.push(repo);
        }

        enriched
    }
}
