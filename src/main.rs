// SPDX-License-Identifier: MIT

//! Voice Studio API Server
//!
//! Issues session tokens after Google sign-in and serves the asynchronous
//! text-to-speech job API for the AI Voice Studio storefront.

use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voice_studio::{
    config::Config,
    models::user::mock_users,
    services::{jobs, GoogleAuthVerifier, JobSettings, JobStore},
    AppState,
};

const JOB_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);
const JOB_RETENTION: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Voice Studio API");

    let google_verifier =
        Arc::new(GoogleAuthVerifier::new(&config).expect("Failed to initialize Google verifier"));

    // In-memory job store plus the background sweep that evicts terminal
    // jobs after the retention window.
    let job_store = Arc::new(JobStore::new(JobSettings::from(&config)));
    jobs::spawn_sweeper(job_store.clone(), JOB_SWEEP_INTERVAL, JOB_RETENTION);
    tracing::info!(
        min_delay_ms = config.job_min_delay_ms,
        max_delay_ms = config.job_max_delay_ms,
        "Job store initialized"
    );

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        google_verifier,
        jobs: job_store,
        users: mock_users(),
    });

    // Build router
    let app = voice_studio::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("voice_studio=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
