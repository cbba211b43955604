//! Group Statistics Module
//!
//! Tracks per-group read-path metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Group Stats ==
/// Live counters for one group's read path.
///
/// Counters are atomics so the group can record events without taking the
/// cache lock; reads produce a point-in-time [`StatsSnapshot`].
#[derive(Debug, Default)]
pub struct GroupStats {
    hits: AtomicU64,
    misses: AtomicU64,
    local_loads: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
}

impl GroupStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Local cache served the value.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Local cache missed; a load was scheduled.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// The loader produced the value.
    pub fn record_local_load(&self) {
        self.local_loads.fetch_add(1, Ordering::Relaxed);
    }

    /// A peer produced the value.
    pub fn record_peer_load(&self) {
        self.peer_loads.fetch_add(1, Ordering::Relaxed);
    }

    /// A peer fetch failed and the loader fallback ran.
    pub fn record_peer_error(&self) {
        self.peer_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Captures the counters together with the cache gauges supplied by the
    /// caller.
    pub fn snapshot(&self, entries: usize, used_bytes: u64, evictions: u64) -> StatsSnapshot {
        StatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            local_loads: self.local_loads.load(Ordering::Relaxed),
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.peer_errors.load(Ordering::Relaxed),
            evictions,
            entries,
            used_bytes,
        }
    }
}

// == Stats Snapshot ==
/// Point-in-time view of a group's metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsSnapshot {
    /// Local cache hits.
    pub hits: u64,
    /// Local cache misses.
    pub misses: u64,
    /// Values produced by the loader.
    pub local_loads: u64,
    /// Values produced by a peer.
    pub peer_loads: u64,
    /// Peer fetches that failed over to the loader.
    pub peer_errors: u64,
    /// Entries evicted from the local cache.
    pub evictions: u64,
    /// Live entries in the local cache.
    pub entries: usize,
    /// Bytes accounted to live entries.
    pub used_bytes: u64,
}

impl StatsSnapshot {
    /// Hits over total lookups, or 0.0 before any traffic.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
