// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::plan::PRICING_PLANS;
use crate::models::{PricingPlan, User};
use crate::services::voices::{Voice, VOICES};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

/// Authenticated API routes.
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/session/me", get(get_me))
        .route("/api/users", get(list_users))
        .route("/api/voices", get(list_voices))
        .route("/api/plans", get(list_plans))
}

// ─── Session ─────────────────────────────────────────────────

/// Verified identity claims of the current session.
#[derive(Serialize)]
pub struct MeResponse {
    pub email: String,
    pub name: String,
    pub picture: String,
    pub is_admin: bool,
}

/// Return the caller's verified session claims.
///
/// The client may decode its token locally for display, but anything that
/// gates data goes through this server-verified view.
async fn get_me(Extension(user): Extension<AuthUser>) -> Json<MeResponse> {
    Json(MeResponse {
        email: user.email,
        name: user.name,
        picture: user.picture,
        is_admin: user.is_admin,
    })
}

// ─── User directory (admin only) ─────────────────────────────

#[derive(Serialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
}

/// List all users. Admin only.
async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserListResponse>> {
    user.require_admin()?;

    Ok(Json(UserListResponse {
        items: state.users.clone(),
    }))
}

// ─── Catalog ─────────────────────────────────────────────────

/// List the available voices.
async fn list_voices() -> Json<&'static [Voice]> {
    Json(VOICES)
}

/// List the pricing plans (display data).
async fn list_plans() -> Json<&'static [PricingPlan]> {
    Json(PRICING_PLANS)
}
