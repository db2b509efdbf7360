// SPDX-License-Identifier: MIT

//! Services module - business logic layer.

pub mod google_auth;
pub mod jobs;
pub mod poller;
pub mod voices;

pub use google_auth::{GoogleAuthError, GoogleAuthVerifier, VerifiedGoogleUser};
pub use jobs::{JobSettings, JobStore};
pub use poller::{poll_until_terminal, HttpStatusSource, JobStatusSource, PollOutcome};
pub use voices::{find_voice, Voice, VOICES};
