//! Cache Maintenance Task
//!
//! Periodically clears both caches and forgets users whose rate-limit
//! window is empty.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::orchestrator::ServiceState;

/// Spawns the maintenance loop.
///
/// The first run happens one `interval` after spawning. Clearing runs
/// under each cache's own lock, so it is safe against concurrent traffic.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_maintenance_task(state: ServiceState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            interval_secs = interval.as_secs(),
            "Starting cache maintenance task"
        );

        loop {
            tokio::time::sleep(interval).await;
            run_maintenance(&state).await;
        }
    })
}

/// One maintenance pass.
pub async fn run_maintenance(state: &ServiceState) {
    let lookup_entries = state.lookup_cache.len().await;
    let extraction_entries = state.extraction_cache.len().await;

    state.lookup_cache.clear().await;
    state.extraction_cache.clear().await;
    let purged = state.rate_limiter.purge_idle();

    if lookup_entries + extraction_entries > 0 {
        info!(
            lookup_entries,
            extraction_entries, purged, "Cleared caches"
        );
    } else {
        debug!(purged, "Maintenance: caches already empty");
    }
}
