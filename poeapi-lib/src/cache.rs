use cached::{Cached, SizedCache};
use std::fmt::{self, Debug};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{ErrorKind, Result};

/// Hit and miss counters of a [`ResponseCache`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that had to go to the network
    pub misses: u64,
}

/// In-memory least-recently-used store of response bodies, keyed by the
/// full request URL.
///
/// Both reads and writes count as use. Once the cache is full, inserting a
/// new URL evicts the entry that was used longest ago. Entries never expire
/// on their own.
pub struct ResponseCache {
    store: Mutex<SizedCache<String, String>>,
    capacity: usize,
}

impl ResponseCache {
    /// Create an empty cache holding at most `capacity` responses
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidCacheSize`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity < 1 {
            return Err(ErrorKind::InvalidCacheSize(capacity));
        }

        Ok(Self {
            store: Mutex::new(SizedCache::with_size(capacity)),
            capacity,
        })
    }

    /// Look up the body stored for `url` and mark it as most recently used
    #[must_use]
    pub fn get(&self, url: &str) -> Option<String> {
        let key = url.to_owned();
        self.lock().cache_get(&key).cloned()
    }

    /// Store `body` for `url`, replacing any previous body.
    ///
    /// Inserting a new URL into a full cache evicts the least recently used
    /// entry.
    pub fn put(&self, url: String, body: String) {
        let mut store = self.lock();
        // Re-inserting puts an overwritten entry at the front
        let replaced = store.cache_remove(&url).is_some();
        if !replaced && store.cache_size() == self.capacity {
            log::trace!("Response cache full ({} entries), evicting oldest", self.capacity);
        }
        store.cache_set(url, body);
    }

    /// Number of cached responses
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().cache_size()
    }

    /// Returns `true` if nothing has been cached yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of cached responses
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Lookup statistics since the cache was created
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let store = self.lock();
        CacheStats {
            hits: store.cache_hits().unwrap_or_default(),
            misses: store.cache_misses().unwrap_or_default(),
        }
    }

    // A panic while holding the lock cannot leave the LRU structure half
    // updated, so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, SizedCache<String, String>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for ResponseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;

    fn filled(capacity: usize) -> ResponseCache {
        let cache = ResponseCache::new(capacity).unwrap();
        for i in 0..capacity {
            cache.put(format!("url-{i}"), format!("body-{i}"));
        }
        cache
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert_eq!(
            ResponseCache::new(0).unwrap_err(),
            ErrorKind::InvalidCacheSize(0)
        );
    }

    #[test]
    fn test_get_returns_stored_values() {
        let cache = filled(3);

        assert_eq!(cache.len(), 3);
        for i in 0..3 {
            assert_eq!(cache.get(&format!("url-{i}")), Some(format!("body-{i}")));
        }
        assert_eq!(cache.get("url-3"), None);
    }

    #[test]
    fn test_insert_beyond_capacity_evicts_least_recently_used() {
        let cache = filled(3);

        cache.put("url-3".into(), "body-3".into());

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get("url-0"), None);
        assert_eq!(cache.get("url-1"), Some("body-1".into()));
        assert_eq!(cache.get("url-2"), Some("body-2".into()));
        assert_eq!(cache.get("url-3"), Some("body-3".into()));
    }

    #[test]
    fn test_read_protects_from_eviction() {
        let cache = filled(3);

        // url-0 is the oldest entry until it is read
        assert!(cache.get("url-0").is_some());
        cache.put("url-3".into(), "body-3".into());

        assert_eq!(cache.get("url-0"), Some("body-0".into()));
        assert_eq!(cache.get("url-1"), None);
    }

    #[test]
    fn test_read_entry_outlives_untouched_entries() {
        let cache = filled(3);

        assert!(cache.get("url-0").is_some());
        cache.put("new-a".into(), "a".into());
        cache.put("new-b".into(), "b".into());

        // The two untouched entries went first
        assert_eq!(cache.get("url-0"), Some("body-0".into()));
        assert_eq!(cache.get("url-1"), None);
        assert_eq!(cache.get("url-2"), None);
    }

    #[test]
    fn test_overwrite_updates_value_and_recency() {
        let cache = filled(2);

        cache.put("url-0".into(), "fresh".into());
        assert_eq!(cache.len(), 2);

        // url-1 is now the least recently used
        cache.put("url-2".into(), "body-2".into());
        assert_eq!(cache.get("url-0"), Some("fresh".into()));
        assert_eq!(cache.get("url-1"), None);
    }

    #[test]
    fn test_stats() {
        let cache = filled(1);

        let _ = cache.get("url-0");
        let _ = cache.get("url-0");
        let _ = cache.get("missing");

        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 1 });
    }

    #[test]
    fn test_concurrent_access() {
        let cache = Arc::new(ResponseCache::new(16).unwrap());

        thread::scope(|scope| {
            for worker in 0..8 {
                let cache = Arc::clone(&cache);
                scope.spawn(move || {
                    for i in 0..200 {
                        let url = format!("url-{}", (worker * 7 + i) % 40);
                        match cache.get(&url) {
                            Some(body) => assert_eq!(body, format!("body-{url}")),
                            None => cache.put(url.clone(), format!("body-{url}")),
                        }
                    }
                });
            }
        });

        assert!(cache.len() <= cache.capacity());
        assert!(!cache.is_empty());
    }
}
