//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::stats::CacheCounters;
use crate::cache::{CacheEntry, CacheStats, LruTracker};

// == Cache Store ==
/// Bounded key-value storage with LRU eviction and lazy TTL expiry.
///
/// The store itself is single-owner (`&mut self`); [`SharedCache`] wraps it
/// for concurrent use.
///
/// [`SharedCache`]: crate::cache::SharedCache
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance counters
    counters: CacheCounters,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Lifetime of every entry
    ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries; a capacity of zero is raised to one
    /// * `ttl` - How long an entry stays readable after its last `set`
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            counters: CacheCounters::default(),
            capacity: capacity.max(1),
            ttl,
        }
    }

    // == Set ==
    /// Stores a value, overwriting any previous entry for the key.
    ///
    /// If the key is new and the cache is full, the least recently used
    /// entry is evicted first.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.set_at(key, value, Instant::now());
    }

    /// [`set`](Self::set) with an explicit clock reading.
    pub fn set_at(&mut self, key: impl Into<String>, value: V, now: Instant) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.counters.record_eviction();
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, now));
        self.lru.touch(&key);
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Expired entries are removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// [`get`](Self::get) with an explicit clock reading.
    pub fn get_at(&mut self, key: &str, now: Instant) -> Option<V> {
        let ttl = self.ttl;
        let Some(entry) = self.entries.get_mut(key) else {
            self.counters.record_miss();
            return None;
        };

        if entry.is_expired(ttl, now) {
            self.entries.remove(key);
            self.lru.remove(key);
            self.counters.record_expiration();
            return None;
        }

        entry.record_access(now);
        let value = entry.value.clone();
        self.lru.touch(key);
        self.counters.record_hit();
        Some(value)
    }

    // == Clear ==
    /// Removes every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
    }

    // == Stats ==
    /// Returns current cache statistics without sweeping expired entries.
    pub fn stats(&self) -> CacheStats {
        let total_accesses = self.entries.values().map(|e| e.access_count).sum();
        CacheStats::new(
            self.entries.len(),
            self.capacity,
            total_accesses,
            self.counters,
        )
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        self.cleanup_expired_at(Instant::now())
    }

    /// [`cleanup_expired`](Self::cleanup_expired) with an explicit clock reading.
    pub fn cleanup_expired_at(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(ttl, now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
            self.counters.expirations += 1;
        }

        expired_keys.len()
    }

    // == Accessors ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Access count of a live entry, without touching it.
    pub fn access_count(&self, key: &str) -> Option<u64> {
        self.entries.get(key).map(|e| e.access_count)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_store_new() {
        let store: CacheStore<String> = CacheStore::new(100, TTL);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
    }

    #[test]
    fn test_store_zero_capacity_is_raised() {
        let store: CacheStore<String> = CacheStore::new(0, TTL);
        assert_eq!(store.capacity(), 1);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1", "value1".to_string());

        assert_eq!(store.get("key1"), Some("value1".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store: CacheStore<String> = CacheStore::new(100, TTL);
        assert_eq!(store.get("nonexistent"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_overwrite_resets_access_count() {
        let mut store = CacheStore::new(100, TTL);

        store.set("key1", 1);
        store.get("key1");
        store.get("key1");
        assert_eq!(store.access_count("key1"), Some(3));

        store.set("key1", 2);
        assert_eq!(store.access_count("key1"), Some(1));
        assert_eq!(store.get("key1"), Some(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new(100, Duration::from_secs(1));
        let now = Instant::now();

        store.set_at("key1", "value1", now);
        assert!(store.get_at("key1", now + Duration::from_millis(500)).is_some());

        assert_eq!(store.get_at("key1", now + Duration::from_millis(1100)), None);
        assert!(store.is_empty(), "expired entry should be removed on read");
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_store_ttl_measured_from_set_not_last_access() {
        let mut store = CacheStore::new(100, Duration::from_secs(10));
        let now = Instant::now();

        store.set_at("key1", 7, now);
        assert!(store.get_at("key1", now + Duration::from_secs(9)).is_some());

        // Reads do not extend the lifetime
        assert_eq!(store.get_at("key1", now + Duration::from_secs(11)), None);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3, TTL);

        store.set("key1", 1);
        store.set("key2", 2);
        store.set("key3", 3);
        store.set("key4", 4);

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.get("key2"), Some(2));
        assert_eq!(store.get("key3"), Some(3));
        assert_eq!(store.get("key4"), Some(4));
        assert_eq!(store.stats().evictions, 1);
    }

    #[test]
    fn test_store_capacity_two_get_protects_entry() {
        let mut store = CacheStore::new(2, TTL);

        store.set("A", "a");
        store.set("B", "b");
        store.get("A");
        store.set("C", "c");

        assert_eq!(store.get("B"), None);
        assert_eq!(store.get("A"), Some("a"));
        assert_eq!(store.get("C"), Some("c"));
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = CacheStore::new(2, TTL);

        store.set("A", 1);
        store.set("B", 2);
        store.set("A", 10);

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("B"), Some(2));
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_clear() {
        let mut store = CacheStore::new(10, TTL);
        store.set("a", 1);
        store.set("b", 2);

        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);
        assert_eq!(store.stats().entries, 0);
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(4, TTL);

        store.set("key1", 1);
        store.set("key2", 2);
        store.get("key1");
        store.get("key1");
        let _ = store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.capacity, 4);
        assert_eq!(stats.utilization, 0.5);
        assert_eq!(stats.total_accesses, 4);
        assert_eq!(stats.avg_accesses, 2.0);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_store_stats_do_not_sweep() {
        let mut store = CacheStore::new(4, Duration::from_secs(1));
        let now = Instant::now();
        store.set_at("key1", 1, now - Duration::from_secs(5));

        assert_eq!(store.stats().entries, 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = CacheStore::new(100, Duration::from_secs(10));
        let now = Instant::now();

        store.set_at("key1", 1, now);
        store.set_at("key2", 2, now + Duration::from_secs(8));

        let removed = store.cleanup_expired_at(now + Duration::from_secs(11));
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_at("key2", now + Duration::from_secs(11)), Some(2));
    }
}
