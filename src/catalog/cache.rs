//! Keyed fetch cache with freshness and eviction windows.
//!
//! Each entry records when its value was fetched and when it was last handed
//! out. An entry is *fresh* while younger than the freshness window; fresh
//! entries satisfy non-forced requests without a network call. An entry is
//! *evicted* once it has gone unused for the eviction window.
//!
//! Both predicates are free functions over timestamps so they can be checked
//! in isolation from any runtime.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// One cached value.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
}

/// True while `fetched_at` is less than `stale_after` in the past.
#[must_use]
pub fn is_fresh(fetched_at: DateTime<Utc>, now: DateTime<Utc>, stale_after: Duration) -> bool {
    now.signed_duration_since(fetched_at) < stale_after
}

/// True once `last_used` is at least `evict_after` in the past.
#[must_use]
pub fn is_evictable(last_used: DateTime<Utc>, now: DateTime<Utc>, evict_after: Duration) -> bool {
    now.signed_duration_since(last_used) >= evict_after
}

/// Fetch results keyed by a string cache key.
#[derive(Debug, Clone)]
pub struct QueryCache<T> {
    entries: HashMap<String, CacheEntry<T>>,
    stale_after: Duration,
    evict_after: Duration,
}

impl<T: Clone> QueryCache<T> {
    #[must_use]
    pub fn new(stale_after: Duration, evict_after: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            stale_after,
            evict_after,
        }
    }

    /// Returns the value for `key` if it is still fresh, marking it used.
    pub fn get_fresh(&mut self, key: &str, now: DateTime<Utc>) -> Option<T> {
        self.sweep(now);

        let entry = self.entries.get_mut(key)?;
        if !is_fresh(entry.fetched_at, now, self.stale_after) {
            tracing::trace!(cache_key = key, "cache entry is stale");
            return None;
        }

        entry.last_used = now;
        Some(entry.value.clone())
    }

    /// Stores `value` for `key`, replacing any previous entry.
    pub fn insert(&mut self, key: &str, value: T, now: DateTime<Utc>) {
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                fetched_at: now,
                last_used: now,
            },
        );
    }

    /// Drops every entry unused for the eviction window.
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let evict_after = self.evict_after;
        self.entries
            .retain(|_, entry| !is_evictable(entry.last_used, now, evict_after));

        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed = removed, "evicted unused cache entries");
        }
        removed
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<T>> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    fn cache() -> QueryCache<Vec<u32>> {
        QueryCache::new(Duration::minutes(5), Duration::minutes(10))
    }

    #[test]
    fn freshness_window_is_exclusive_at_its_end() {
        let window = Duration::minutes(5);
        assert!(is_fresh(t0(), t0() + Duration::seconds(299), window));
        assert!(!is_fresh(t0(), t0() + Duration::minutes(5), window));
    }

    #[test]
    fn eviction_happens_once_window_elapses() {
        let window = Duration::minutes(10);
        assert!(!is_evictable(t0(), t0() + Duration::minutes(9), window));
        assert!(is_evictable(t0(), t0() + Duration::minutes(10), window));
    }

    #[test]
    fn fresh_entries_are_served() {
        let mut cache = cache();
        cache.insert("k", vec![1, 2], t0());
        assert_eq!(cache.get_fresh("k", t0() + Duration::minutes(4)), Some(vec![1, 2]));
    }

    #[test]
    fn stale_entries_are_kept_but_not_served() {
        let mut cache = cache();
        cache.insert("k", vec![1], t0());

        assert_eq!(cache.get_fresh("k", t0() + Duration::minutes(6)), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn unused_entries_are_evicted() {
        let mut cache = cache();
        cache.insert("old", vec![1], t0());
        cache.insert("new", vec![2], t0() + Duration::minutes(8));

        let removed = cache.sweep(t0() + Duration::minutes(11));
        assert_eq!(removed, 1);
        assert!(cache.entry("old").is_none());
        assert!(cache.entry("new").is_some());
    }

    #[test]
    fn serving_an_entry_postpones_its_eviction() {
        let mut cache = cache();
        cache.insert("k", vec![1], t0());
        assert!(cache.get_fresh("k", t0() + Duration::minutes(4)).is_some());

        cache.sweep(t0() + Duration::minutes(12));
        assert!(cache.entry("k").is_some());

        cache.sweep(t0() + Duration::minutes(14));
        assert!(cache.is_empty());
    }
}
