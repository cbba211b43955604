//! HTTP Transport Module
//!
//! The peer-to-peer collaborator: serves this node's groups over HTTP and
//! fetches from remote peers. The group facade only ever sees the
//! [`PeerPicker`](crate::peers::PeerPicker) /
//! [`PeerGetter`](crate::peers::PeerGetter) traits implemented here.

mod client;
mod handlers;
mod pool;
mod routes;

// Re-export public types
pub use client::HttpGetter;
pub use pool::{HttpPool, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};
pub use routes::create_router;
