// SPDX-License-Identifier: MIT

//! Google sign-in authentication route.

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::middleware::auth::create_session_jwt;
use crate::models::User;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/google", post(google_sign_in))
}

/// Request body carrying the Google Identity Services credential.
#[derive(Deserialize)]
pub struct GoogleSignInRequest {
    #[serde(rename = "idToken", alias = "credential")]
    id_token: Option<String>,
}

/// Response: the session token plus the resolved user profile.
#[derive(Serialize)]
pub struct GoogleSignInResponse {
    pub token: String,
    pub user: User,
}

/// Exchange a Google credential for an application session token.
///
/// The credential is verified against Google before any claim in it is
/// trusted. The admin flag is computed here, server-side, from the
/// configured allow-list; nothing the caller sends can set it.
async fn google_sign_in(
    State(state): State<Arc<AppState>>,
    Json(body): Json<GoogleSignInRequest>,
) -> Result<Json<GoogleSignInResponse>> {
    let credential = body
        .id_token
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing idToken".to_string()))?;

    let identity = state.google_verifier.verify_id_token(credential).await?;

    let is_admin = state.config.is_admin_email(&identity.email);

    let token = create_session_jwt(
        &identity.email,
        &identity.name,
        &identity.picture,
        is_admin,
        state.config.session_ttl_secs,
        &state.config.jwt_signing_key,
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {e}")))?;

    // Known users keep their directory record; first-time sign-ins get a
    // fresh profile seeded with the starter credit grant.
    let user = state
        .users
        .iter()
        .find(|u| u.email.eq_ignore_ascii_case(&identity.email))
        .cloned()
        .unwrap_or_else(|| User {
            id: format!("user_{}", identity.subject),
            name: identity.name.clone(),
            email: identity.email.clone(),
            avatar: identity.picture.clone(),
            credits: 50_000,
            role: if is_admin { "admin" } else { "user" }.to_string(),
            join_date: chrono::Utc::now().format("%Y-%m-%d").to_string(),
        });

    tracing::info!(email = %identity.email, is_admin, "Session issued");

    Ok(Json(GoogleSignInResponse { token, user }))
}
