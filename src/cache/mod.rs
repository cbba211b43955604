//! Cache Module
//!
//! Provides the byte-bounded LRU engine and its thread-safe wrapper.

mod lru;
mod shared;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use lru::{EvictionCallback, LruCache, Value};
pub use shared::SharedCache;
