//! Group Module
//!
//! A group is a named cache namespace bound to one loader and a bounded
//! local hot set. A read consults the local cache, then enters a single
//! flight that asks the owning peer and falls back to the loader, with the
//! loader's result populating the local cache. Groups are created through
//! an explicit [`Registry`] constructed at program start.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::byteview::ByteView;
use crate::cache::SharedCache;
use crate::error::{CacheError, Result};
use crate::pb;
use crate::peers::{PeerGetter, PeerPicker};
use crate::singleflight::SingleFlight;
use crate::stats::{GroupStats, StatsSnapshot};

/// Error produced by a user-supplied loader.
pub type LoaderError = Box<dyn std::error::Error + Send + Sync>;

// == Loader ==
/// The origin-fetch capability: produces authoritative bytes for a key.
#[async_trait]
pub trait Loader: Send + Sync {
    /// Fetches the value for `key` from the backing source.
    async fn load(&self, key: &str) -> std::result::Result<Vec<u8>, LoaderError>;
}

/// Adapter letting a plain closure act as a [`Loader`].
pub struct LoaderFn<F>(pub F);

#[async_trait]
impl<F> Loader for LoaderFn<F>
where
    F: Fn(&str) -> std::result::Result<Vec<u8>, LoaderError> + Send + Sync,
{
    async fn load(&self, key: &str) -> std::result::Result<Vec<u8>, LoaderError> {
        (self.0)(key)
    }
}

// == Group ==
/// A cache namespace with its loader, local hot set and peer wiring.
pub struct Group {
    name: String,
    loader: Box<dyn Loader>,
    main_cache: SharedCache,
    /// Installed at most once, after the transport exists.
    peers: OnceLock<Arc<dyn PeerPicker>>,
    /// Collapses concurrent loads of the same key.
    flight: SingleFlight<Result<ByteView>>,
    stats: GroupStats,
}

impl Group {
    fn new(name: &str, cache_bytes: u64, loader: Box<dyn Loader>) -> Self {
        Self {
            name: name.to_owned(),
            loader,
            main_cache: SharedCache::new(cache_bytes),
            peers: OnceLock::new(),
            flight: SingleFlight::new(),
            stats: GroupStats::new(),
        }
    }

    /// The group's registered name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Installs the peer picker. May be called at most once.
    ///
    /// # Panics
    /// Panics on a second call; double registration is a programming error.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        if self.peers.set(peers).is_err() {
            panic!("register_peers called more than once for group {}", self.name);
        }
    }

    // == Get ==
    /// Looks up `key`, consulting the local cache, then the owning peer,
    /// then the loader. Concurrent lookups of the same key share one fetch.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::KeyRequired);
        }

        if let Some(view) = self.main_cache.get(key) {
            self.stats.record_hit();
            debug!(group = %self.name, key, "cache hit");
            return Ok(view);
        }
        self.stats.record_miss();

        self.flight.run(key, || self.load(key)).await
    }

    /// Single-flight body: peer first, loader as fallback.
    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(picker) = self.peers.get() {
            if let Some(peer) = picker.pick_peer(key) {
                match self.get_from_peer(peer.as_ref(), key).await {
                    Ok(view) => {
                        self.stats.record_peer_load();
                        return Ok(view);
                    }
                    Err(err) => {
                        // Any node can serve any key; an unavailable owner
                        // degrades to a local load instead of failing.
                        self.stats.record_peer_error();
                        warn!(
                            group = %self.name,
                            key,
                            error = %err,
                            "peer fetch failed, falling back to loader"
                        );
                    }
                }
            }
        }

        self.get_locally(key).await
    }

    /// Fetches from the backing source and populates the local cache.
    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self
            .loader
            .load(key)
            .await
            .map_err(|err| CacheError::Loader(err.to_string()))?;
        let view = ByteView::from(bytes);
        self.populate_cache(key, view.clone());
        self.stats.record_local_load();
        debug!(group = %self.name, key, len = view.len(), "loaded from origin");
        Ok(view)
    }

    /// Fetches from a remote peer. Peer values are NOT cached locally: the
    /// owner populates its own hot set, and duplicating it here would grow
    /// near-identical hot sets on every node.
    async fn get_from_peer(&self, peer: &dyn PeerGetter, key: &str) -> Result<ByteView> {
        let request = pb::Request {
            group: self.name.clone(),
            key: key.to_owned(),
        };
        let response = peer.get(&request).await?;
        Ok(ByteView::from(response.value))
    }

    fn populate_cache(&self, key: &str, value: ByteView) {
        self.main_cache.add(key, value);
    }

    /// Point-in-time metrics for this group.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot(
            self.main_cache.len(),
            self.main_cache.used_bytes(),
            self.main_cache.evictions(),
        )
    }
}

// == Registry ==
/// Process-wide directory of groups.
///
/// Constructed once at program start and shared; lookups are read-locked
/// and groups live for the process lifetime.
#[derive(Default)]
pub struct Registry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a group.
    ///
    /// # Panics
    /// Panics if `name` is already registered; silently replacing a group
    /// would strand handles other callers already hold.
    pub fn new_group(&self, name: &str, cache_bytes: u64, loader: Box<dyn Loader>) -> Arc<Group> {
        let mut groups = self.groups.write();
        if groups.contains_key(name) {
            panic!("group {name} already registered");
        }
        let group = Arc::new(Group::new(name, cache_bytes, loader));
        groups.insert(name.to_owned(), group.clone());
        group
    }

    /// Looks up a previously created group.
    pub fn get(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Metrics for every registered group, keyed by name.
    pub fn stats(&self) -> std::collections::BTreeMap<String, StatsSnapshot> {
        self.groups
            .read()
            .iter()
            .map(|(name, group)| (name.clone(), group.stats()))
            .collect()
    }
}
