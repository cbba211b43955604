//! LRU Engine Module
//!
//! Byte-bounded key/value store with strict least-recently-used eviction.
//!
//! The engine is single-threaded on purpose: all concurrency control belongs
//! to the caller (see [`SharedCache`](crate::cache::SharedCache)). The
//! recency list is an arena-allocated doubly-linked list, so touching or
//! evicting an entry is O(1).

use std::collections::HashMap;

/// Types stored in the cache report their byte size for capacity accounting.
pub trait Value {
    /// Size of the value in bytes.
    fn size(&self) -> usize;
}

/// Callback invoked with the key and value of every evicted entry.
pub type EvictionCallback<V> = Box<dyn FnMut(&str, &V) + Send>;

/// Node in the recency list. Indices into the arena stand in for pointers.
struct Node<V> {
    key: String,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU Cache ==
/// Byte-bounded LRU cache.
///
/// Each entry accounts for `key.len() + value.size()` bytes. After every
/// `add`, entries are evicted from the least-recently-used end until the
/// byte count fits the capacity again. A capacity of 0 disables eviction
/// entirely.
pub struct LruCache<V: Value> {
    /// Capacity in bytes; 0 means unbounded.
    max_bytes: u64,
    /// Current byte count over all live entries.
    used_bytes: u64,
    /// Arena backing the recency list.
    nodes: Vec<Option<Node<V>>>,
    /// Recycled arena slots.
    free: Vec<usize>,
    /// Most recently used entry.
    head: Option<usize>,
    /// Least recently used entry.
    tail: Option<usize>,
    /// Key -> arena slot.
    index: HashMap<String, usize>,
    /// Invoked for every evicted entry, if set.
    on_evicted: Option<EvictionCallback<V>>,
}

impl<V: Value> LruCache<V> {
    /// Creates an empty cache with the given byte capacity (0 = unbounded).
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            used_bytes: 0,
            nodes: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            index: HashMap::new(),
            on_evicted: None,
        }
    }

    /// Creates an empty cache that reports evictions through `on_evicted`.
    pub fn with_eviction(max_bytes: u64, on_evicted: EvictionCallback<V>) -> Self {
        let mut cache = Self::new(max_bytes);
        cache.on_evicted = Some(on_evicted);
        cache
    }

    // == Add ==
    /// Inserts or updates a value.
    ///
    /// An existing entry is moved to the front and its value replaced; the
    /// byte count is adjusted by the size difference. A new entry is pushed
    /// at the front and accounts for `key.len() + value.size()` bytes.
    /// Either way, oldest entries are then evicted while the byte count
    /// exceeds a non-zero capacity.
    pub fn add(&mut self, key: &str, value: V) {
        if let Some(&idx) = self.index.get(key) {
            self.move_to_front(idx);
            if let Some(node) = self.nodes[idx].as_mut() {
                let old_size = node.value.size() as u64;
                let new_size = value.size() as u64;
                self.used_bytes = self.used_bytes + new_size - old_size;
                node.value = value;
            }
        } else {
            self.used_bytes += (key.len() + value.size()) as u64;
            let idx = self.alloc(Node {
                key: key.to_owned(),
                value,
                prev: None,
                next: None,
            });
            self.attach_front(idx);
            self.index.insert(key.to_owned(), idx);
        }

        while self.max_bytes > 0 && self.used_bytes > self.max_bytes {
            self.remove_oldest();
        }
    }

    // == Get ==
    /// Looks up a key, marking the entry as most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        self.nodes[idx].as_ref().map(|node| &node.value)
    }

    // == Remove Oldest ==
    /// Evicts the least-recently-used entry, invoking the eviction callback.
    ///
    /// Does nothing on an empty cache.
    pub fn remove_oldest(&mut self) {
        let Some(idx) = self.tail else {
            return;
        };
        self.unlink(idx);
        self.free.push(idx);
        if let Some(node) = self.nodes[idx].take() {
            self.index.remove(&node.key);
            self.used_bytes -= (node.key.len() + node.value.size()) as u64;
            if let Some(on_evicted) = self.on_evicted.as_mut() {
                on_evicted(&node.key, &node.value);
            }
        }
    }

    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns true when the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Current byte count over all live entries.
    pub fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    // == Recency List ==

    /// Detaches `idx` from the list; prev/next of the node are cleared.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.nodes[idx].as_ref() {
            Some(node) => (node.prev, node.next),
            None => return,
        };
        match prev {
            Some(p) => {
                if let Some(node) = self.nodes[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.nodes[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = None;
        }
    }

    /// Attaches a detached node at the head of the list.
    fn attach_front(&mut self, idx: usize) {
        if let Some(node) = self.nodes[idx].as_mut() {
            node.prev = None;
            node.next = self.head;
        }
        if let Some(old_head) = self.head {
            if let Some(node) = self.nodes[old_head].as_mut() {
                node.prev = Some(idx);
            }
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.attach_front(idx);
    }

    /// Places a node in the arena, reusing a freed slot when available.
    fn alloc(&mut self, node: Node<V>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Some(node);
                idx
            }
            None => {
                self.nodes.push(Some(node));
                self.nodes.len() - 1
            }
        }
    }
}
