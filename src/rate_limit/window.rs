//! Sliding Window Module
//!
//! Per-user record of admitted request times.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::rate_limit::RateLimitConfig;

// == Decision ==
/// Result of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request admitted and recorded
    Admitted,
    /// Too many requests clustered inside the burst window
    BurstLimited,
    /// Full window quota exhausted
    WindowLimited,
}

impl Decision {
    pub fn is_admitted(self) -> bool {
        matches!(self, Decision::Admitted)
    }
}

// == Sliding Window ==
/// Admitted request timestamps in arrival order, oldest at the front.
#[derive(Debug, Default, Clone)]
pub struct SlidingWindow {
    timestamps: VecDeque<Instant>,
}

impl SlidingWindow {
    pub fn new() -> Self {
        Self::default()
    }

    // == Prune ==
    /// Drops timestamps older than `now - window` from the front.
    pub fn prune(&mut self, now: Instant, window: Duration) {
        while let Some(&oldest) = self.timestamps.front() {
            if now.saturating_duration_since(oldest) > window {
                self.timestamps.pop_front();
            } else {
                break;
            }
        }
    }

    // == Check ==
    /// Prunes, then admits and records `now` if both limits allow it.
    ///
    /// A rejected request does not consume a slot.
    pub fn check(&mut self, now: Instant, config: &RateLimitConfig) -> Decision {
        self.prune(now, config.window);

        if config.burst_limit > 0 && self.timestamps.len() >= config.burst_limit {
            if let Some(&oldest) = self.timestamps.front() {
                if now.saturating_duration_since(oldest) < config.burst_window {
                    return Decision::BurstLimited;
                }
            }
        }

        if self.timestamps.len() < config.max_requests {
            self.timestamps.push_back(now);
            Decision::Admitted
        } else {
            Decision::WindowLimited
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Oldest admitted request still tracked.
    pub fn oldest(&self) -> Option<Instant> {
        self.timestamps.front().copied()
    }
}
