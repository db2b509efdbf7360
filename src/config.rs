//! Application configuration loaded from environment variables.
//!
//! Everything is read once at startup; there is no persistent storage, so
//! the admin allow-list and job-timing knobs live here too.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Google OAuth client ID; the expected `aud` of Google ID tokens
    pub google_client_id: String,
    /// Frontend URL for CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// Session token lifetime in seconds
    pub session_ttl_secs: u64,
    /// Emails granted admin privileges (consulted only server-side)
    pub admin_emails: Vec<String>,
    /// Lower bound of the simulated synthesis delay (milliseconds)
    pub job_min_delay_ms: u64,
    /// Upper bound of the simulated synthesis delay (milliseconds)
    pub job_max_delay_ms: u64,
    /// Reserved input text that forces the failure branch of a job.
    /// The demo backend otherwise always succeeds; this keeps the
    /// failed-state logic exercisable.
    pub job_fail_text: String,
}

const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60; // 7 days

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let job_min_delay_ms = parse_env_or("JOB_MIN_DELAY_MS", 2000);
        let job_max_delay_ms = parse_env_or("JOB_MAX_DELAY_MS", 4000);
        if job_max_delay_ms < job_min_delay_ms {
            return Err(ConfigError::Invalid(
                "JOB_MAX_DELAY_MS must be >= JOB_MIN_DELAY_MS",
            ));
        }

        Ok(Self {
            google_client_id: env::var("GOOGLE_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("GOOGLE_CLIENT_ID"))?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            jwt_signing_key: env::var("JWT_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
                .into_bytes(),
            session_ttl_secs: parse_env_or("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS),
            admin_emails: env::var("ADMIN_EMAILS")
                .map(|raw| parse_admin_emails(&raw))
                .unwrap_or_default(),
            job_min_delay_ms,
            job_max_delay_ms,
            job_fail_text: env::var("JOB_FAIL_TEXT").unwrap_or_else(|_| "__fail__".to_string()),
        })
    }

    /// Whether the given email is on the admin allow-list.
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }

    /// Default config for testing only: deterministic keys and delay bounds
    /// small enough for job tests to finish quickly.
    pub fn test_default() -> Self {
        Self {
            google_client_id: "test-client-id.apps.googleusercontent.com".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!!".to_vec(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            admin_emails: vec!["admin@aivoice.studio".to_string()],
            job_min_delay_ms: 10,
            job_max_delay_ms: 20,
            job_fail_text: "__fail__".to_string(),
        }
    }
}

fn parse_env_or(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_admin_emails(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
