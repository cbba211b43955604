//! Peer Abstraction Module
//!
//! The two capabilities a transport must provide to a group: picking the
//! peer that owns a key, and fetching a value from that peer. The group
//! depends only on these traits; the HTTP transport in [`crate::http`] is
//! one implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::pb;

/// Locates the peer that owns a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the getter for the owning peer, or `None` when the key
    /// resolves to the current node (a picker never picks self).
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}

/// Fetches a value from a single remote peer.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    /// Retrieves the value for `request` from the peer. Transport errors
    /// bubble out and the caller decides how to degrade.
    async fn get(&self, request: &pb::Request) -> Result<pb::Response>;
}
