//! gcache - A distributed in-memory read-through cache
//!
//! Keys live in named groups; each node owns a slice of the key space
//! under consistent hashing, misses are coalesced so one fetch serves all
//! concurrent requesters, and values come from the owning peer or a
//! user-supplied loader.

pub mod byteview;
pub mod cache;
pub mod config;
pub mod error;
pub mod group;
pub mod http;
pub mod models;
pub mod pb;
pub mod peers;
pub mod ring;
pub mod singleflight;
pub mod stats;

pub use byteview::ByteView;
pub use config::Config;
pub use error::{CacheError, Result};
pub use group::{Group, Loader, LoaderError, LoaderFn, Registry};
pub use http::{create_router, HttpPool};
