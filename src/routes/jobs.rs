// SPDX-License-Identifier: MIT

//! Asynchronous TTS job routes (submit + status polling).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::JobStatus;
use crate::AppState;

/// Job routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/tts/jobs", post(submit_job))
        .route("/api/tts/jobs/{id}", get(job_status))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    text: String,
    voice_id: String,
}

#[derive(Serialize)]
pub struct SubmitJobResponse {
    pub id: String,
}

/// Submit a TTS job.
///
/// Returns 202 with the job id immediately; the result is discovered by
/// polling the status endpoint.
async fn submit_job(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SubmitJobRequest>,
) -> Result<(StatusCode, Json<SubmitJobResponse>)> {
    let id = state.jobs.submit(&user.email, &body.text, &body.voice_id)?;

    Ok((StatusCode::ACCEPTED, Json(SubmitJobResponse { id })))
}

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub id: String,
    pub status: JobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Get the current status of a job.
///
/// Visible only to the job's owner or an admin.
async fn job_status(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<JobStatusResponse>> {
    let job = state.jobs.get_for_caller(&id, &user.email, user.is_admin)?;

    Ok(Json(JobStatusResponse {
        id: job.id,
        status: job.status,
        url: job.url,
        error: job.error,
    }))
}
