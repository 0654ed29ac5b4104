//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with access tracking.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached value plus the metadata used for expiry and statistics.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was written
    pub created_at: Instant,
    /// Number of successful accesses, including the initial write
    pub access_count: u64,
    /// Time of the last successful get or set
    pub last_accessed_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry written at `now` with an access count of one.
    pub fn new(value: V, now: Instant) -> Self {
        Self {
            value,
            created_at: now,
            access_count: 1,
            last_accessed_at: now,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry has outlived `ttl` as of `now`.
    ///
    /// The age must strictly exceed the TTL; an entry read exactly at
    /// `created_at + ttl` is still live.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) > ttl
    }

    // == Age ==
    /// Time elapsed since the entry was written.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }

    // == Record Access ==
    /// Bumps the access counter and the last-access time.
    pub fn record_access(&mut self, now: Instant) {
        self.access_count += 1;
        self.last_accessed_at = now;
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or zero once expired.
    pub fn ttl_remaining(&self, ttl: Duration, now: Instant) -> Duration {
        ttl.saturating_sub(self.age(now))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let now = Instant::now();
        let entry = CacheEntry::new("test_value".to_string(), now);

        assert_eq!(entry.value, "test_value");
        assert_eq!(entry.access_count, 1);
        assert_eq!(entry.created_at, now);
        assert_eq!(entry.last_accessed_at, now);
    }

    #[test]
    fn test_entry_not_expired_within_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, now);

        assert!(!entry.is_expired(Duration::from_secs(10), now + Duration::from_secs(9)));
    }

    #[test]
    fn test_entry_expired_after_ttl() {
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, now);

        assert!(entry.is_expired(Duration::from_secs(10), now + Duration::from_millis(10_001)));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        // Exactly at the TTL boundary the entry is still live
        let now = Instant::now();
        let entry = CacheEntry::new(1u32, now);
        let ttl = Duration::from_secs(5);

        assert!(!entry.is_expired(ttl, now + ttl));
    }

    #[test]
    fn test_record_access() {
        let now = Instant::now();
        let mut entry = CacheEntry::new("v", now);
        let later = now + Duration::from_secs(3);

        entry.record_access(later);
        entry.record_access(later);

        assert_eq!(entry.access_count, 3);
        assert_eq!(entry.last_accessed_at, later);
        assert_eq!(entry.created_at, now);
    }

    #[test]
    fn test_ttl_remaining() {
        let now = Instant::now();
        let entry = CacheEntry::new("v", now);
        let ttl = Duration::from_secs(10);

        assert_eq!(entry.ttl_remaining(ttl, now + Duration::from_secs(4)), Duration::from_secs(6));
        assert_eq!(entry.ttl_remaining(ttl, now + Duration::from_secs(40)), Duration::ZERO);
    }
}
