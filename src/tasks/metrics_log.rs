//! Periodic metrics log.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::orchestrator::ServiceState;

/// Default gap between metric log lines
pub const METRICS_LOG_INTERVAL: Duration = Duration::from_secs(600);

/// Spawns a task that sweeps expired cache entries and logs cache and
/// service metrics every `interval`.
pub fn spawn_metrics_task(state: ServiceState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            log_metrics(&state).await;
        }
    })
}

pub async fn log_metrics(state: &ServiceState) {
    let swept = state.lookup_cache.cleanup_expired().await
        + state.extraction_cache.cleanup_expired().await;
    if swept > 0 {
        debug!(swept, "Swept expired cache entries");
    }

    let lookup = state.lookup_cache.stats().await;
    let extraction = state.extraction_cache.stats().await;
    let service = state.metrics.snapshot();

    info!(
        messages = service.messages,
        successes = service.successes,
        failures = service.failures,
        rate_limited = service.rate_limited,
        cancelled = service.cancelled,
        avg_response_ms = service.avg_response_ms,
        lookup_entries = lookup.entries,
        lookup_hit_rate = lookup.hit_rate(),
        extraction_entries = extraction.entries,
        extraction_hit_rate = extraction.hit_rate(),
        tracked_users = state.rate_limiter.tracked_users(),
        "Service metrics"
    );
}
