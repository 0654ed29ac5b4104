//! Rate Limiter Module
//!
//! Per-user sliding-window admission control with burst protection.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::Serialize;
use tracing::debug;

use crate::models::UserId;
use crate::rate_limit::{Decision, RateLimitConfig, SlidingWindow};

// == Rate Limit Stats ==
/// Snapshot of one user's window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLimitStats {
    /// Admitted requests still inside the window
    pub requests_in_window: usize,
    /// Requests left before the hard limit
    pub remaining: usize,
    /// `now + window`
    pub reset_time: DateTime<Utc>,
    /// Seconds until `reset_time`
    pub reset_after_secs: u64,
    /// Whether the user is at the hard limit
    pub is_limited: bool,
}

// == Rate Limiter ==
/// Sliding-window rate limiter keyed by user.
///
/// Windows live in a sharded concurrent map. Every check runs while holding
/// that user's entry guard, so concurrent checks for the same user are
/// serialized and can never both take the last slot, while different users
/// only contend when they hash to the same shard.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<UserId, SlidingWindow>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    // == Constructor ==
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    // == Is Allowed ==
    /// Admits and records a request for `user` if the limits allow it.
    pub fn is_allowed(&self, user: UserId) -> bool {
        self.check_at(user, Instant::now()).is_admitted()
    }

    /// Runs the admission check at `now` and reports why a request was refused.
    pub fn check_at(&self, user: UserId, now: Instant) -> Decision {
        let decision = self
            .windows
            .entry(user)
            .or_default()
            .check(now, &self.config);

        if !decision.is_admitted() {
            debug!(user, ?decision, "Request refused by rate limiter");
        }
        decision
    }

    // == Remaining ==
    /// Requests left for `user` in the current window.
    pub fn remaining(&self, user: UserId) -> usize {
        self.remaining_at(user, Instant::now())
    }

    pub fn remaining_at(&self, user: UserId, now: Instant) -> usize {
        self.config
            .max_requests
            .saturating_sub(self.count_at(user, now))
    }

    // == Stats ==
    /// Returns the window snapshot for `user`.
    pub fn stats(&self, user: UserId) -> RateLimitStats {
        self.stats_at(user, Instant::now())
    }

    pub fn stats_at(&self, user: UserId, now: Instant) -> RateLimitStats {
        let count = self.count_at(user, now);
        let window = self.config.window;

        RateLimitStats {
            requests_in_window: count,
            remaining: self.config.max_requests.saturating_sub(count),
            reset_time: Utc::now()
                + chrono::Duration::from_std(window).unwrap_or_else(|_| chrono::Duration::zero()),
            reset_after_secs: window.as_secs(),
            is_limited: count >= self.config.max_requests,
        }
    }

    /// Estimated wait before `user` should retry.
    pub fn retry_after(&self) -> Duration {
        self.config.window
    }

    // == Purge Idle ==
    /// Drops users with no requests left in their window.
    ///
    /// Returns the number of users removed.
    pub fn purge_idle(&self) -> usize {
        self.purge_idle_at(Instant::now())
    }

    pub fn purge_idle_at(&self, now: Instant) -> usize {
        let window = self.config.window;
        let before = self.windows.len();
        self.windows.retain(|_, w| {
            w.prune(now, window);
            !w.is_empty()
        });
        before.saturating_sub(self.windows.len())
    }

    /// Number of users currently tracked.
    pub fn tracked_users(&self) -> usize {
        self.windows.len()
    }

    /// Prunes the user's window and returns its length. Unknown users are
    /// not inserted.
    fn count_at(&self, user: UserId, now: Instant) -> usize {
        match self.windows.get_mut(&user) {
            Some(mut window) => {
                window.prune(now, self.config.window);
                window.len()
            }
            None => 0,
        }
    }
}
