//! Cache Statistics Module
//!
//! Snapshot of cache occupancy, access totals and performance counters.

use serde::Serialize;

// == Cache Counters ==
/// Running hit/miss/eviction counters kept by a cache store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub expirations: u64,
}

impl CacheCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// An expired read counts as both an expiration and a miss.
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
        self.misses += 1;
    }
}

// == Cache Stats ==
/// Point-in-time view of a cache.
///
/// Counts are raw: computing stats never sweeps expired entries, so an
/// expired-but-unread entry is still reported until a read or cleanup
/// removes it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries in the cache
    pub entries: usize,
    /// Maximum number of entries
    pub capacity: usize,
    /// `entries / capacity`
    pub utilization: f64,
    /// Sum of access counts across live entries
    pub total_accesses: u64,
    /// Mean accesses per entry, 0 when empty
    pub avg_accesses: f64,
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed retrievals (key absent or expired)
    pub misses: u64,
    /// Number of entries evicted due to LRU policy
    pub evictions: u64,
    /// Number of entries dropped after their TTL elapsed
    pub expirations: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Builds a snapshot from occupancy figures and the running counters.
    pub fn new(
        entries: usize,
        capacity: usize,
        total_accesses: u64,
        counters: CacheCounters,
    ) -> Self {
        let utilization = if capacity == 0 {
            0.0
        } else {
            entries as f64 / capacity as f64
        };
        let avg_accesses = if entries == 0 {
            0.0
        } else {
            total_accesses as f64 / entries as f64
        };

        Self {
            entries,
            capacity,
            utilization,
            total_accesses,
            avg_accesses,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            expirations: counters.expirations,
        }
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
