//! Bounded retry policy shared by both providers.

use std::future::Future;
use std::time::Duration;

use tokio_retry2::strategy::jitter;
use tokio_retry2::{Retry, RetryError};
use tracing::warn;

use crate::error::CollaboratorError;

// == Retry Policy ==
/// Per-attempt timeout plus bounded exponential backoff.
///
/// Attempt `n` (zero-based) that fails transiently waits
/// `min(base_delay * 2^n, max_delay)` before the next one, optionally
/// jittered. Permanent failures are returned immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
    /// Deadline for each individual attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            jitter: true,
            timeout: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Policy that never waits between attempts.
    pub fn immediate(max_attempts: u32, timeout: Duration) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            jitter: false,
            timeout,
        }
    }

    // == Delays ==
    /// Sleep before each retry; one fewer than `max_attempts`.
    pub fn delays(&self) -> Vec<Duration> {
        (0..self.max_attempts.saturating_sub(1))
            .map(|n| {
                let delay = self
                    .base_delay
                    .checked_mul(2u32.saturating_pow(n))
                    .unwrap_or(self.max_delay)
                    .min(self.max_delay);
                if self.jitter {
                    jitter(delay)
                } else {
                    delay
                }
            })
            .collect()
    }

    // == Run ==
    /// Runs `call` until it succeeds, fails permanently, or attempts run out.
    ///
    /// Each attempt is cancelled if it exceeds `timeout`.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T, CollaboratorError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, CollaboratorError>>,
    {
        let timeout = self.timeout;
        let mut attempt = 0u32;

        Retry::spawn(self.delays(), || {
            attempt += 1;
            let current = attempt;
            let pending = call();
            async move {
                let result = match tokio::time::timeout(timeout, pending).await {
                    Ok(result) => result,
                    Err(_) => Err(CollaboratorError::Timeout),
                };
                result.map_err(|err| {
                    if err.is_retryable() {
                        warn!(operation, attempt = current, error = %err, "Transient provider failure");
                        RetryError::Transient {
                            err,
                            retry_after: None,
                        }
                    } else {
                        RetryError::Permanent(err)
                    }
                })
            }
        })
        .await
    }
}
