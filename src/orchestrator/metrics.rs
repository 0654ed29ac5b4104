//! Service metrics and the bounded failure log.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::FailureKind;
use crate::models::UserId;
use crate::orchestrator::Outcome;

/// Successful response times kept for the running average
pub const RESPONSE_TIME_WINDOW: usize = 1000;
/// Failures kept in the error log
pub const ERROR_LOG_CAPACITY: usize = 100;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// == Service Metrics ==
/// Outcome counters plus a rolling window of successful response times.
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    messages: AtomicU64,
    successes: AtomicU64,
    rate_limited: AtomicU64,
    no_keywords: AtomicU64,
    no_results: AtomicU64,
    failures: AtomicU64,
    cancelled: AtomicU64,
    collaborator_errors: AtomicU64,
    response_times: Mutex<VecDeque<Duration>>,
}

/// Point-in-time copy of [`ServiceMetrics`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub messages: u64,
    pub successes: u64,
    pub rate_limited: u64,
    pub no_keywords: u64,
    pub no_results: u64,
    pub failures: u64,
    /// Messages dropped by the caller before an outcome was produced
    pub cancelled: u64,
    pub collaborator_errors: u64,
    /// Mean over the last successful requests, in milliseconds
    pub avg_response_ms: f64,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one handled message and its outcome.
    pub fn record(&self, outcome: &Outcome, elapsed: Duration) {
        self.messages.fetch_add(1, Ordering::Relaxed);

        let counter = match outcome {
            Outcome::Success { .. } => {
                let mut times = lock(&self.response_times);
                if times.len() >= RESPONSE_TIME_WINDOW {
                    times.pop_front();
                }
                times.push_back(elapsed);
                &self.successes
            }
            Outcome::RateLimited { .. } => &self.rate_limited,
            Outcome::NoKeywords => &self.no_keywords,
            Outcome::NoResults => &self.no_results,
            Outcome::Failed { .. } => &self.failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a message whose handling was abandoned mid-flight.
    pub fn record_cancelled(&self) {
        self.messages.fetch_add(1, Ordering::Relaxed);
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a collaborator call that failed after retries.
    pub fn record_collaborator_error(&self) {
        self.collaborator_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let avg_response_ms = {
            let times = lock(&self.response_times);
            if times.is_empty() {
                0.0
            } else {
                let total: Duration = times.iter().sum();
                total.as_secs_f64() * 1000.0 / times.len() as f64
            }
        };

        MetricsSnapshot {
            messages: self.messages.load(Ordering::Relaxed),
            successes: self.successes.load(Ordering::Relaxed),
            rate_limited: self.rate_limited.load(Ordering::Relaxed),
            no_keywords: self.no_keywords.load(Ordering::Relaxed),
            no_results: self.no_results.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            collaborator_errors: self.collaborator_errors.load(Ordering::Relaxed),
            avg_response_ms,
        }
    }
}

// == Error Log ==
/// One collaborator failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub timestamp: DateTime<Utc>,
    pub user: UserId,
    /// `extract` or `lookup`
    pub stage: &'static str,
    pub kind: FailureKind,
    pub message: String,
}

/// Ring buffer of the most recent failures.
#[derive(Debug)]
pub struct ErrorLog {
    records: Mutex<VecDeque<ErrorRecord>>,
    capacity: usize,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::new(ERROR_LOG_CAPACITY)
    }
}

impl ErrorLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&self, record: ErrorRecord) {
        let mut records = lock(&self.records);
        if records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Oldest first.
    pub fn recent(&self) -> Vec<ErrorRecord> {
        lock(&self.records).iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
