// SPDX-License-Identifier: MIT

//! Text-to-speech job record and status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of an asynchronous TTS job.
///
/// Transitions are monotonic: `Queued -> Processing -> Completed | Failed`,
/// with `Processing` optional. Terminal states never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Whether this status is terminal (no further transition possible).
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// Whether a transition from `self` to `next` is legal.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        match self {
            JobStatus::Queued => matches!(
                next,
                JobStatus::Processing | JobStatus::Completed | JobStatus::Failed
            ),
            JobStatus::Processing => matches!(next, JobStatus::Completed | JobStatus::Failed),
            JobStatus::Completed | JobStatus::Failed => false,
        }
    }
}

/// A single TTS job stored in the in-memory job store.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    /// Opaque, collision-resistant identifier
    pub id: String,
    /// Email of the submitting user; only the owner (or an admin) may read
    pub owner: String,
    pub status: JobStatus,
    /// Result audio URL, set when the job completes
    pub url: Option<String>,
    /// Error description, set when the job fails
    pub error: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
