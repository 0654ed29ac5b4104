//! Rate Limiting Module
//!
//! Sliding-window admission control with a burst sub-window.

mod limiter;
mod window;


use std::time::Duration;

pub use limiter::{RateLimitStats, RateLimiter};
pub use window::{Decision, SlidingWindow};

// == Rate Limit Config ==
/// Limits applied to every user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Hard cap on admitted requests per window
    pub max_requests: usize,
    /// Length of the sliding window
    pub window: Duration,
    /// Requests allowed inside `burst_window`; 0 disables burst protection
    pub burst_limit: usize,
    /// Length of the burst sub-window
    pub burst_window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 15,
            window: Duration::from_secs(60),
            burst_limit: 5,
            burst_window: Duration::from_secs(10),
        }
    }
}
