// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod job;
pub mod plan;
pub mod user;

pub use job::{Job, JobStatus};
pub use plan::PricingPlan;
pub use user::User;
