//! Shared Cache Module
//!
//! Thread-safe wrapper around the LRU engine.
//!
//! The wrapper owns a single mutex and allocates the LRU lazily on the first
//! `add`, so groups that never see traffic pay no memory cost. It also pins
//! the generic `Value` contract down to the concrete [`ByteView`] the rest
//! of the system trades in.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::byteview::ByteView;
use crate::cache::LruCache;

// == Shared Cache ==
/// Mutex-guarded, lazily-allocated LRU of [`ByteView`] values.
pub struct SharedCache {
    /// Capacity in bytes handed to the LRU on first use; 0 = unbounded.
    max_bytes: u64,
    /// Evicted-entry counter, bumped by the LRU eviction callback.
    evictions: Arc<AtomicU64>,
    inner: Mutex<Option<LruCache<ByteView>>>,
}

impl SharedCache {
    /// Creates a wrapper for a cache of at most `max_bytes` bytes.
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            evictions: Arc::new(AtomicU64::new(0)),
            inner: Mutex::new(None),
        }
    }

    /// Inserts a value, allocating the LRU on first use.
    pub fn add(&self, key: &str, value: ByteView) {
        let mut inner = self.inner.lock();
        let cache = inner.get_or_insert_with(|| {
            let evictions = self.evictions.clone();
            LruCache::with_eviction(
                self.max_bytes,
                Box::new(move |key, _value: &ByteView| {
                    evictions.fetch_add(1, Ordering::Relaxed);
                    debug!(key, "evicted cache entry");
                }),
            )
        });
        cache.add(key, value);
    }

    /// Looks up a key, refreshing its recency on a hit.
    ///
    /// Returns `None` until the first `add` allocates the cache.
    pub fn get(&self, key: &str) -> Option<ByteView> {
        let mut inner = self.inner.lock();
        inner.as_mut()?.get(key).cloned()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, LruCache::len)
    }

    /// Returns true when no entries are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current byte count over all live entries.
    pub fn used_bytes(&self) -> u64 {
        self.inner.lock().as_ref().map_or(0, LruCache::used_bytes)
    }

    /// Total entries evicted over the lifetime of this cache.
    pub fn evictions(&self) -> u64 {
        self.evictions.load(Ordering::Relaxed)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_allocation() {
        let cache = SharedCache::new(1024);
        // No LRU exists yet; lookups miss without allocating.
        assert_eq!(cache.get("missing"), None);
        assert!(cache.inner.lock().is_none());

        cache.add("key", ByteView::from("value"));
        assert!(cache.inner.lock().is_some());
        assert_eq!(cache.get("key"), Some(ByteView::from("value")));
    }

    #[test]
    fn test_eviction_counter() {
        // Room for exactly one "kN"/"vN" entry.
        let cache = SharedCache::new(4);
        cache.add("k1", ByteView::from("v1"));
        cache.add("k2", ByteView::from("v2"));
        cache.add("k3", ByteView::from("v3"));

        assert_eq!(cache.evictions(), 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_len_and_used_bytes() {
        let cache = SharedCache::new(0);
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.used_bytes(), 0);

        cache.add("key", ByteView::from("value"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.used_bytes(), ("key".len() + "value".len()) as u64);
    }

    #[test]
    fn test_shared_across_threads() {
        use std::sync::Arc;

        let cache = Arc::new(SharedCache::new(0));
        let mut handles = Vec::new();
        for i in 0..8 {
            let cache = cache.clone();
            handles.push(std::thread::spawn(move || {
                for j in 0..100 {
                    cache.add(&format!("key-{i}-{j}"), ByteView::from("x"));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 800);
    }
}
