//! Request Orchestrator
//!
//! Chains admission control, keyword extraction, seed mapping and the
//! catalog lookup for one user message, and always answers with exactly
//! one [`Outcome`].
//!
//! # Flow
//! 1. Rate limiter admission (consumes a slot)
//! 2. Extraction, cached by message hash
//! 3. Seed mapping
//! 4. Lookup, cached by sorted-keyword hash

mod handler;
mod locks;
mod metrics;
mod state;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::collaborators::RetryPolicy;
use crate::error::FailureKind;
use crate::models::Track;

pub use handler::Orchestrator;
pub use locks::{UserLockGuard, UserLocks};
pub use metrics::{
    ErrorLog, ErrorRecord, MetricsSnapshot, ServiceMetrics, ERROR_LOG_CAPACITY,
    RESPONSE_TIME_WINDOW,
};
pub use state::ServiceState;

// == Outcome ==
/// Terminal result of handling one message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// Refused by the rate limiter; try again later
    RateLimited { retry_after_secs: u64 },
    /// Extraction produced no keywords
    NoKeywords,
    /// The catalog had nothing for these keywords
    NoResults,
    Success {
        tracks: Vec<Track>,
        keywords: Vec<String>,
    },
    /// A collaborator failed after retries
    Failed { kind: FailureKind },
}

impl Outcome {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::RateLimited { .. } => "rate_limited",
            Outcome::NoKeywords => "no_keywords",
            Outcome::NoResults => "no_results",
            Outcome::Success { .. } => "success",
            Outcome::Failed { .. } => "failed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }
}

// == Orchestrator Config ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorConfig {
    /// Shared by both collaborators
    pub retry: RetryPolicy,
    /// Substitute the heuristic keyword scan when extraction fails
    pub fallback_extraction: bool,
    /// Queue concurrent requests from the same user
    pub serialize_per_user: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            fallback_extraction: true,
            serialize_per_user: true,
        }
    }
}

// == Identity Stats ==
/// Rate-limit window plus lifetime successes for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdentityStats {
    pub requests_in_window: usize,
    pub remaining: usize,
    pub reset_time: DateTime<Utc>,
    pub is_limited: bool,
    /// Successful recommendations served to this user
    pub total_requests: u64,
}
