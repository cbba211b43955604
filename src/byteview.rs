//! Byte View Module
//!
//! Immutable byte payload handed out by the cache.

use std::fmt;

use bytes::Bytes;

use crate::cache::Value;

// == Byte View ==
/// An immutable view over an owned byte buffer.
///
/// Cloning a `ByteView` is cheap: clones share the underlying allocation.
/// The bytes themselves are never mutated after construction, so a view can
/// be handed to any number of concurrent readers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    b: Bytes,
}

impl ByteView {
    /// Returns the length of the view in bytes.
    pub fn len(&self) -> usize {
        self.b.len()
    }

    /// Returns true if the view holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Returns a fresh copy of the data as a byte vector.
    ///
    /// The returned vector never aliases the view's interior, so callers may
    /// mutate it freely.
    pub fn byte_slice(&self) -> Vec<u8> {
        self.b.to_vec()
    }

    /// Borrows the underlying bytes without copying.
    pub fn as_bytes(&self) -> &[u8] {
        &self.b
    }
}

impl From<Vec<u8>> for ByteView {
    /// Takes ownership of `bytes`; no further copy is needed because the
    /// caller gives up its handle.
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            b: Bytes::from(bytes),
        }
    }
}

impl From<&[u8]> for ByteView {
    fn from(bytes: &[u8]) -> Self {
        Self {
            b: Bytes::copy_from_slice(bytes),
        }
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self {
            b: Bytes::copy_from_slice(s.as_bytes()),
        }
    }
}

impl fmt::Display for ByteView {
    /// Renders the data as a string, lossily for non-UTF-8 payloads.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.b))
    }
}

impl Value for ByteView {
    fn size(&self) -> usize {
        self.b.len()
    }
}
