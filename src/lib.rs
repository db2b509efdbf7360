// SPDX-License-Identifier: MIT

//! Voice Studio: backend for the AI Voice Studio text-to-speech storefront.
//!
//! This crate issues session tokens after Google sign-in and exposes the
//! polling-based asynchronous TTS job API the browser frontend consumes.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use models::User;
use services::{GoogleAuthVerifier, JobStore};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub google_verifier: Arc<GoogleAuthVerifier>,
    pub jobs: Arc<JobStore>,
    /// In-memory user directory (mock data; lost on restart)
    pub users: Vec<User>,
}
