// SPDX-License-Identifier: MIT

//! Client-side polling loop for asynchronous job status.
//!
//! The storefront discovers job completion by repeated `GET` on the status
//! endpoint; this module is the Rust side of that contract. One status
//! fetch per tick, never overlapping, and teardown cancels the loop before
//! the next fetch is issued.

use crate::models::JobStatus;
use serde::Deserialize;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Default tick interval used by the storefront.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Status view returned by the job API.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusView {
    pub id: String,
    pub status: JobStatus,
    pub url: Option<String>,
    pub error: Option<String>,
}

/// Source of job status snapshots.
///
/// The production implementation is [`HttpStatusSource`]; tests substitute
/// scripted fakes.
pub trait JobStatusSource {
    fn fetch(
        &self,
        job_id: &str,
    ) -> impl std::future::Future<Output = anyhow::Result<JobStatusView>> + Send;
}

/// Outcome of a polling loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// A terminal status was observed.
    Terminal {
        status: JobStatus,
        url: Option<String>,
        error: Option<String>,
    },
    /// A fetch failed; presented as a failure, the server job is untouched.
    /// The user retries with a whole new submission, not this job id.
    TransportFailed(String),
    /// The consuming view was torn down before a terminal status arrived.
    Cancelled,
}

/// Poll `source` for `job_id` every `interval` until a terminal status,
/// a fetch error, or cancellation.
///
/// Fetches are issued strictly sequentially; after `cancel` fires no
/// further fetch is started.
pub async fn poll_until_terminal<S: JobStatusSource>(
    source: &S,
    job_id: &str,
    interval: Duration,
    cancel: &CancellationToken,
) -> PollOutcome {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        // Cancellation must win over a simultaneously ready tick so no
        // fetch starts after teardown is requested.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(job_id = %job_id, "Polling cancelled");
                return PollOutcome::Cancelled;
            }
            _ = ticker.tick() => {}
        }

        let view = match source.fetch(job_id).await {
            Ok(view) => view,
            Err(e) => {
                tracing::warn!(job_id = %job_id, error = %e, "Status fetch failed");
                return PollOutcome::TransportFailed(e.to_string());
            }
        };

        if view.status.is_terminal() {
            return PollOutcome::Terminal {
                status: view.status,
                url: view.url,
                error: view.error,
            };
        }
    }
}

/// HTTP implementation of [`JobStatusSource`] against the job API.
pub struct HttpStatusSource {
    client: reqwest::Client,
    base_url: String,
    session_token: String,
}

impl HttpStatusSource {
    pub fn new(base_url: impl Into<String>, session_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            session_token: session_token.into(),
        }
    }
}

impl JobStatusSource for HttpStatusSource {
    async fn fetch(&self, job_id: &str) -> anyhow::Result<JobStatusView> {
        let url = format!(
            "{}/api/tts/jobs/{}",
            self.base_url.trim_end_matches('/'),
            job_id
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.session_token)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("status endpoint returned {}", response.status());
        }

        Ok(response.json().await?)
    }
}
