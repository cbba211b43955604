//! HTTP Pool Module
//!
//! Peer membership for one node: owns the consistent-hash ring and the
//! per-peer HTTP getters, and implements the picker half of the peer
//! abstraction.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::group::Registry;
use crate::http::HttpGetter;
use crate::peers::{PeerGetter, PeerPicker};
use crate::ring::HashRing;

/// URL prefix under which the cache protocol is served.
pub const DEFAULT_BASE_PATH: &str = "/_gcache/";

/// Virtual nodes per peer on the ring.
pub const DEFAULT_REPLICAS: usize = 50;

/// Ring and getter table, always replaced together.
struct PoolState {
    ring: HashRing,
    getters: HashMap<String, Arc<HttpGetter>>,
}

// == HTTP Pool ==
/// HTTP peer pool for a single node.
///
/// `set_peers` swaps in a freshly built ring and getter table under one
/// lock, so a concurrent `pick_peer` observes either the old membership or
/// the new one, never a mix.
pub struct HttpPool {
    /// This node's advertised base URL, e.g. `http://10.0.0.1:3000`.
    self_url: String,
    base_path: String,
    registry: Arc<Registry>,
    /// One client shared by every getter; reqwest pools connections per
    /// host internally.
    client: reqwest::Client,
    state: Mutex<PoolState>,
}

impl HttpPool {
    /// Creates a pool serving under [`DEFAULT_BASE_PATH`].
    pub fn new(self_url: impl Into<String>, registry: Arc<Registry>) -> Self {
        Self::with_base_path(self_url, registry, DEFAULT_BASE_PATH)
    }

    /// Creates a pool serving under a custom base path.
    pub fn with_base_path(
        self_url: impl Into<String>,
        registry: Arc<Registry>,
        base_path: impl Into<String>,
    ) -> Self {
        Self {
            self_url: self_url.into(),
            base_path: base_path.into(),
            registry,
            client: reqwest::Client::new(),
            state: Mutex::new(PoolState {
                ring: HashRing::new(DEFAULT_REPLICAS),
                getters: HashMap::new(),
            }),
        }
    }

    /// The registry whose groups this pool serves.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn self_url(&self) -> &str {
        &self.self_url
    }

    // == Set Peers ==
    /// Replaces the peer membership.
    ///
    /// The ring and the getter table are rebuilt from scratch and installed
    /// atomically. Requests already in flight against a removed peer run to
    /// completion and surface transport errors; their callers fall back to
    /// the local loader.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers
            .into_iter()
            .map(|peer| peer.as_ref().to_owned())
            .collect();

        let mut ring = HashRing::new(DEFAULT_REPLICAS);
        ring.add(&peers);

        let getters = peers
            .iter()
            .map(|peer| {
                let base_url = format!("{}{}", peer, self.base_path);
                (
                    peer.clone(),
                    Arc::new(HttpGetter::new(self.client.clone(), base_url)),
                )
            })
            .collect();

        let mut state = self.state.lock();
        state.ring = ring;
        state.getters = getters;
        info!(self_url = %self.self_url, peers = peers.len(), "peer membership updated");
    }
}

impl PeerPicker for HttpPool {
    /// Resolves `key` on the ring, returning `None` when this node owns it.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let state = self.state.lock();
        let peer = state.ring.get(key)?;
        if peer == self.self_url {
            return None;
        }
        debug!(peer, key, "picked remote peer");
        let getter = state.getters.get(peer)?.clone();
        Some(getter)
    }
}
