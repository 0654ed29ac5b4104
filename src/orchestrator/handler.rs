//! Message handling pipeline.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::cache::CacheStats;
use crate::collaborators::{KeywordExtractor, RecommendationLookup};
use crate::error::CollaboratorError;
use crate::models::UserId;
use crate::orchestrator::{
    ErrorRecord, IdentityStats, MetricsSnapshot, OrchestratorConfig, Outcome, ServiceMetrics,
    ServiceState, UserLocks,
};
use crate::seed::{derive_seed_spec, heuristic_keywords, keyword_cache_key, message_cache_key};

// == Orchestrator ==
pub struct Orchestrator {
    extractor: Arc<dyn KeywordExtractor>,
    lookup: Arc<dyn RecommendationLookup>,
    state: ServiceState,
    config: OrchestratorConfig,
    user_locks: UserLocks,
}

impl Orchestrator {
    pub fn new(
        extractor: Arc<dyn KeywordExtractor>,
        lookup: Arc<dyn RecommendationLookup>,
        state: ServiceState,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            extractor,
            lookup,
            state,
            config,
            user_locks: UserLocks::new(),
        }
    }

    pub fn state(&self) -> &ServiceState {
        &self.state
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    // == Handle Message ==
    /// Turns one user message into recommendations.
    ///
    /// Admission is checked and consumed before any provider is called.
    /// With per-user serialization on, admitted requests from the same user
    /// then run one at a time. A request dropped before it finishes is
    /// counted as cancelled and gives up its turn.
    pub async fn handle_message(&self, user: UserId, text: &str) -> Outcome {
        let started = Instant::now();
        let in_flight = InFlight::new(&self.state.metrics, user);

        let outcome = if !self.state.rate_limiter.is_allowed(user) {
            warn!(user, "Rate limit exceeded");
            Outcome::RateLimited {
                retry_after_secs: self.state.rate_limiter.retry_after().as_secs(),
            }
        } else if self.config.serialize_per_user {
            let _turn = self.user_locks.acquire(user).await;
            self.process(user, text).await
        } else {
            self.process(user, text).await
        };
        in_flight.finish();

        let elapsed = started.elapsed();
        self.state.metrics.record(&outcome, elapsed);
        info!(
            user,
            outcome = outcome.label(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Handled message"
        );
        outcome
    }

    async fn process(&self, user: UserId, text: &str) -> Outcome {
        let keywords = match self.extract_keywords(user, text).await {
            Ok(keywords) => keywords,
            Err(outcome) => return outcome,
        };
        if keywords.is_empty() {
            return Outcome::NoKeywords;
        }

        self.recommend(user, keywords).await
    }

    // == Extraction ==
    async fn extract_keywords(&self, user: UserId, text: &str) -> Result<Vec<String>, Outcome> {
        let key = message_cache_key(text);
        if let Some(keywords) = self.state.extraction_cache.get(&key).await {
            debug!(user, "Extraction cache hit");
            return Ok(keywords);
        }
        debug!(user, "Extraction cache miss");

        let extractor = &self.extractor;
        let result = self
            .config
            .retry
            .run("extract", || extractor.extract(text))
            .await;

        match result {
            Ok(keywords) => {
                if !keywords.is_empty() {
                    self.state.extraction_cache.set(key, keywords.clone()).await;
                }
                Ok(keywords)
            }
            Err(err) => {
                self.record_failure(user, "extract", &err);
                if self.config.fallback_extraction {
                    let keywords = heuristic_keywords(text);
                    warn!(user, count = keywords.len(), "Using heuristic keywords");
                    Ok(keywords)
                } else {
                    Err(Outcome::Failed { kind: err.kind() })
                }
            }
        }
    }

    // == Lookup ==
    async fn recommend(&self, user: UserId, keywords: Vec<String>) -> Outcome {
        let key = keyword_cache_key(&keywords);
        if let Some(tracks) = self.state.lookup_cache.get(&key).await {
            debug!(user, "Lookup cache hit");
            self.state.record_success(user);
            return Outcome::Success { tracks, keywords };
        }
        debug!(user, "Lookup cache miss");

        let seed = derive_seed_spec(&keywords);
        let lookup = &self.lookup;
        let result = self
            .config
            .retry
            .run("lookup", || lookup.lookup(&seed))
            .await;

        match result {
            Ok(tracks) if tracks.is_empty() => Outcome::NoResults,
            Ok(tracks) => {
                self.state.lookup_cache.set(key, tracks.clone()).await;
                self.state.record_success(user);
                Outcome::Success { tracks, keywords }
            }
            Err(CollaboratorError::NotFound) => Outcome::NoResults,
            Err(err) => {
                self.record_failure(user, "lookup", &err);
                Outcome::Failed { kind: err.kind() }
            }
        }
    }

    fn record_failure(&self, user: UserId, stage: &'static str, err: &CollaboratorError) {
        error!(user, stage, error = %err, "Provider call failed");
        self.state.metrics.record_collaborator_error();
        self.state.error_log.push(ErrorRecord {
            timestamp: Utc::now(),
            user,
            stage,
            kind: err.kind(),
            message: err.to_string(),
        });
    }

    // == Stats ==
    pub fn get_stats(&self, user: UserId) -> IdentityStats {
        let window = self.state.rate_limiter.stats(user);
        IdentityStats {
            requests_in_window: window.requests_in_window,
            remaining: window.remaining,
            reset_time: window.reset_time,
            is_limited: window.is_limited,
            total_requests: self.state.total_requests(user),
        }
    }

    /// Lookup cache statistics.
    pub async fn get_cache_stats(&self) -> CacheStats {
        self.state.lookup_cache.stats().await
    }

    pub async fn extraction_cache_stats(&self) -> CacheStats {
        self.state.extraction_cache.stats().await
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.state.metrics.snapshot()
    }

    pub fn recent_errors(&self) -> Vec<ErrorRecord> {
        self.state.error_log.recent()
    }
}

// == In-Flight Tracking ==
/// Counts the message as cancelled if dropped before [`InFlight::finish`].
struct InFlight<'a> {
    metrics: &'a ServiceMetrics,
    user: UserId,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn new(metrics: &'a ServiceMetrics, user: UserId) -> Self {
        Self {
            metrics,
            user,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.metrics.record_cancelled();
            warn!(user = self.user, "Message cancelled before completion");
        }
    }
}
