//! Hash Ring Module
//!
//! Consistent hashing with virtual nodes.
//!
//! Each physical peer is projected onto `replicas` points of a `u32` ring;
//! a key is owned by the peer whose virtual node is the first one at or
//! after the key's hash, wrapping around at the top. Virtual nodes smooth
//! the load imbalance a single hash per peer would produce.
//!
//! The ring is not thread-safe: membership changes are expected to build a
//! fresh ring under the enclosing picker's lock (see
//! [`HttpPool`](crate::http::HttpPool)).

use std::collections::HashMap;

/// Pluggable hash over raw bytes. Defaults to CRC32-IEEE.
pub type HashFn = Box<dyn Fn(&[u8]) -> u32 + Send + Sync>;

// == Hash Ring ==
/// Maps keys to peer identifiers through consistent hashing.
pub struct HashRing {
    /// Virtual nodes per physical peer.
    replicas: usize,
    hash: HashFn,
    /// Sorted virtual-node hashes; binary-searched on lookup.
    keys: Vec<u32>,
    /// Virtual-node hash -> peer identifier. On a hash collision the last
    /// added peer wins.
    peers: HashMap<u32, String>,
}

impl HashRing {
    /// Creates an empty ring hashing with CRC32-IEEE.
    pub fn new(replicas: usize) -> Self {
        Self::with_hash(replicas, Box::new(|data: &[u8]| crc32fast::hash(data)))
    }

    /// Creates an empty ring with a caller-supplied hash function.
    pub fn with_hash(replicas: usize, hash: HashFn) -> Self {
        Self {
            replicas,
            hash,
            keys: Vec::new(),
            peers: HashMap::new(),
        }
    }

    // == Add ==
    /// Inserts peers into the ring.
    ///
    /// Every peer contributes `replicas` virtual nodes, hashed from the
    /// decimal replica index concatenated before the peer identifier
    /// (`"0peer"`, `"1peer"`, ...). The virtual-node array is re-sorted
    /// after all insertions.
    pub fn add<I, S>(&mut self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for peer in peers {
            let peer = peer.as_ref();
            for i in 0..self.replicas {
                let hash = (self.hash)(format!("{i}{peer}").as_bytes());
                self.keys.push(hash);
                self.peers.insert(hash, peer.to_owned());
            }
        }
        self.keys.sort_unstable();
    }

    // == Get ==
    /// Returns the peer owning `key`, or `None` for an empty ring.
    ///
    /// Ownership goes to the first virtual node whose hash is greater than
    /// or equal to the key's hash, wrapping to the smallest virtual node
    /// past the top of the ring.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.keys.is_empty() {
            return None;
        }

        let hash = (self.hash)(key.as_bytes());
        let idx = self.keys.partition_point(|&k| k < hash);
        let idx = if idx == self.keys.len() { 0 } else { idx };
        self.peers.get(&self.keys[idx]).map(String::as_str)
    }

    /// Returns true when no peers have been added.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
