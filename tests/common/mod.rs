// SPDX-License-Identifier: MIT

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use voice_studio::config::Config;
use voice_studio::models::user::mock_users;
use voice_studio::routes::create_router;
use voice_studio::services::{GoogleAuthVerifier, JobSettings, JobStore};
use voice_studio::AppState;

/// Claims mirror of what the auth middleware expects. If the middleware or
/// token issuance changes shape, tests built on this helper will catch it.
#[derive(Serialize)]
struct Claims {
    sub: String,
    name: String,
    picture: String,
    admin: bool,
    exp: usize,
    iat: usize,
}

/// Create a session JWT for tests.
#[allow(dead_code)]
pub fn session_token(email: &str, admin: bool, signing_key: &[u8]) -> String {
    session_token_with_ttl(email, admin, signing_key, 3600)
}

/// Create a session JWT with an explicit TTL; negative values produce an
/// already-expired token.
#[allow(dead_code)]
pub fn session_token_with_ttl(
    email: &str,
    admin: bool,
    signing_key: &[u8],
    ttl_secs: i64,
) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64;

    let claims = Claims {
        sub: email.to_string(),
        name: "Test User".to_string(),
        picture: String::new(),
        admin,
        iat: (now - 7200).max(0) as usize,
        exp: (now + ttl_secs).max(0) as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )
    .expect("Failed to create test JWT")
}

/// Create a test app with deterministic config and an empty job store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();

    let google_verifier =
        Arc::new(GoogleAuthVerifier::new(&config).expect("verifier should build"));
    let jobs = Arc::new(JobStore::new(JobSettings::from(&config)));

    let state = Arc::new(AppState {
        config,
        google_verifier,
        jobs,
        users: mock_users(),
    });

    (create_router(state.clone()), state)
}
