// SPDX-License-Identifier: MIT

//! In-memory TTS job store and simulated asynchronous completion.
//!
//! Submission inserts a `queued` record and spawns the completion task;
//! the caller gets the job id back immediately and discovers the outcome
//! by polling. Each job is mutated only by its own completion task, and
//! the `DashMap` keeps that invariant safe on the multi-threaded runtime.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Job, JobStatus};
use crate::services::voices;
use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// Timing and failure-injection knobs for the simulated synthesis step.
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub min_delay: Duration,
    pub max_delay: Duration,
    /// Submitting exactly this text forces the failure branch.
    pub fail_text: String,
}

impl From<&Config> for JobSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_delay: Duration::from_millis(config.job_min_delay_ms),
            max_delay: Duration::from_millis(config.job_max_delay_ms),
            fail_text: config.job_fail_text.clone(),
        }
    }
}

/// Process-wide registry of TTS jobs.
///
/// Jobs are never deleted by API calls; a background sweep evicts
/// terminal jobs after a retention window.
pub struct JobStore {
    jobs: DashMap<String, Job>,
    settings: JobSettings,
}

impl JobStore {
    pub fn new(settings: JobSettings) -> Self {
        Self {
            jobs: DashMap::new(),
            settings,
        }
    }

    /// Submit a new job.
    ///
    /// Validates the input, stores a `queued` record, schedules the
    /// completion task and returns the fresh job id without blocking on
    /// completion. Identical text submitted twice yields two independent
    /// jobs.
    pub fn submit(
        self: &Arc<Self>,
        owner: &str,
        text: &str,
        voice_id: &str,
    ) -> Result<String, AppError> {
        if text.trim().is_empty() {
            return Err(AppError::BadRequest("Text must not be empty".to_string()));
        }

        let voice = voices::find_voice(voice_id)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown voice: {voice_id}")))?;

        let id = uuid::Uuid::new_v4().to_string();
        let job = Job {
            id: id.clone(),
            owner: owner.to_string(),
            status: JobStatus::Queued,
            url: None,
            error: None,
            created_at: chrono::Utc::now(),
        };
        self.jobs.insert(id.clone(), job);

        tracing::info!(job_id = %id, owner = %owner, voice = %voice_id, "Job queued");

        let store = self.clone();
        let text = text.to_string();
        let result_url = voice.sample_url.to_string();
        let job_id = id.clone();
        tokio::spawn(async move {
            store.complete_async(&job_id, &text, &result_url).await;
        });

        Ok(id)
    }

    /// Look up a job on behalf of a caller, enforcing ownership.
    ///
    /// Only the owner or an admin may read a job.
    pub fn get_for_caller(
        &self,
        job_id: &str,
        caller_email: &str,
        caller_is_admin: bool,
    ) -> Result<Job, AppError> {
        let job = self
            .jobs
            .get(job_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

        if job.owner != caller_email && !caller_is_admin {
            return Err(AppError::Forbidden);
        }

        Ok(job)
    }

    /// Number of jobs currently held (any status).
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Simulated synthesis: wait a randomized delay, pass through
    /// `processing`, then settle on a terminal status exactly once.
    async fn complete_async(self: Arc<Self>, job_id: &str, text: &str, result_url: &str) {
        let total = self.random_delay();
        let first_leg = total / 2;

        tokio::time::sleep(first_leg).await;
        self.transition(job_id, JobStatus::Processing, None, None);

        tokio::time::sleep(total - first_leg).await;

        if text.trim() == self.settings.fail_text {
            self.transition(
                job_id,
                JobStatus::Failed,
                None,
                Some("Speech synthesis failed".to_string()),
            );
        } else {
            self.transition(
                job_id,
                JobStatus::Completed,
                Some(result_url.to_string()),
                None,
            );
        }
    }

    /// Apply a status transition if it is legal; illegal attempts are
    /// logged and dropped so terminal results stay immutable.
    fn transition(
        &self,
        job_id: &str,
        next: JobStatus,
        url: Option<String>,
        error: Option<String>,
    ) -> bool {
        let Some(mut entry) = self.jobs.get_mut(job_id) else {
            // Swept or never existed; nothing to update.
            tracing::debug!(job_id = %job_id, "Completion ran for missing job");
            return false;
        };

        if !entry.status.can_transition_to(next) {
            tracing::warn!(
                job_id = %job_id,
                from = ?entry.status,
                to = ?next,
                "Ignoring illegal job status transition"
            );
            return false;
        }

        entry.status = next;
        if url.is_some() {
            entry.url = url;
        }
        if error.is_some() {
            entry.error = error;
        }

        tracing::info!(job_id = %job_id, status = ?next, "Job status updated");
        true
    }

    fn random_delay(&self) -> Duration {
        let min = self.settings.min_delay;
        let max = self.settings.max_delay;
        if max <= min {
            return min;
        }
        let span_ms = (max - min).as_millis() as u64;
        min + Duration::from_millis(rand::thread_rng().gen_range(0..=span_ms))
    }

    /// Evict terminal jobs older than `retention`. Returns how many were
    /// removed.
    pub fn sweep_terminal(&self, retention: Duration) -> usize {
        let cutoff = chrono::Utc::now()
            - chrono::Duration::from_std(retention).unwrap_or(chrono::Duration::zero());
        let before = self.jobs.len();
        self.jobs
            .retain(|_, job| !(job.status.is_terminal() && job.created_at < cutoff));
        before - self.jobs.len()
    }
}

/// Periodically evict terminal jobs so the store does not grow without
/// bound across the process lifetime.
pub fn spawn_sweeper(store: Arc<JobStore>, every: Duration, retention: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = store.sweep_terminal(retention);
            if evicted > 0 {
                tracing::info!(evicted, remaining = store.len(), "Swept terminal jobs");
            }
        }
    });
}
