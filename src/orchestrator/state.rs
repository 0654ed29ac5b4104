//! Shared service state.

use std::sync::Arc;

use dashmap::DashMap;

use crate::cache::{CacheConfig, SharedCache};
use crate::models::{Track, UserId};
use crate::orchestrator::{ErrorLog, ServiceMetrics};
use crate::rate_limit::{RateLimitConfig, RateLimiter};

/// Everything the orchestrator mutates, owned here and injected.
///
/// Cloning is cheap; every clone sees the same caches and counters, so the
/// background tasks can hold their own handle.
#[derive(Debug, Clone)]
pub struct ServiceState {
    pub rate_limiter: RateLimiter,
    /// Tracks keyed by sorted-keyword hash
    pub lookup_cache: SharedCache<Vec<Track>>,
    /// Keywords keyed by message hash
    pub extraction_cache: SharedCache<Vec<String>>,
    /// Successful requests per user
    pub user_stats: Arc<DashMap<UserId, u64>>,
    pub metrics: Arc<ServiceMetrics>,
    pub error_log: Arc<ErrorLog>,
}

impl ServiceState {
    pub fn new(
        rate_limit: RateLimitConfig,
        lookup_cache: &CacheConfig,
        extraction_cache: &CacheConfig,
    ) -> Self {
        Self {
            rate_limiter: RateLimiter::new(rate_limit),
            lookup_cache: SharedCache::from_config(lookup_cache),
            extraction_cache: SharedCache::from_config(extraction_cache),
            user_stats: Arc::new(DashMap::new()),
            metrics: Arc::new(ServiceMetrics::new()),
            error_log: Arc::new(ErrorLog::default()),
        }
    }

    /// Successful requests recorded for `user`.
    pub fn total_requests(&self, user: UserId) -> u64 {
        self.user_stats.get(&user).map(|count| *count).unwrap_or(0)
    }

    pub(crate) fn record_success(&self, user: UserId) {
        *self.user_stats.entry(user).or_insert(0) += 1;
    }
}

impl Default for ServiceState {
    fn default() -> Self {
        Self::new(
            RateLimitConfig::default(),
            &CacheConfig::default(),
            &CacheConfig::default(),
        )
    }
}
