//! # FIFO (First In, First Out) Cache
//!
//! Evicts the entry that was inserted earliest, ignoring how often or how
//! recently it has been read.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          FifoCache<K, V>                             │
//!   │                                                                      │
//!   │   index: FxHashMap<K, SlotId>                                        │
//!   │        │                                                             │
//!   │        ▼                                                             │
//!   │   order: IntrusiveList<Entry<K, V>>                                  │
//!   │                                                                      │
//!   │     head ─► [d] ◄──► [c] ◄──► [b] ◄──► [a] ◄── tail                  │
//!   │           newest                      oldest (next victim)           │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Semantics
//!
//! - `set` of a new key pushes it at the head; when full the tail goes first.
//! - `set` of a resident key swaps the value in place. Its queue position is
//!   left alone, so an updated key is still evicted by its original arrival.
//! - `get` has no side effect on ordering.
//! - `delete` unlinks the node in O(1).
//!
//! ## Example
//!
//! ```
//! use cachelab::policy::fifo::FifoCache;
//! use cachelab::traits::CoreCache;
//!
//! let mut cache = FifoCache::new(2);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! assert_eq!(cache.get(&"a"), Ok(&1));
//!
//! cache.set("c", 3); // evicts "a" despite the read
//! assert!(!cache.contains(&"a"));
//! assert_eq!(cache.peek_oldest(), Some((&"b", &2)));
//! ```
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::{CacheError, ConfigError, check_capacity};
use crate::traits::CoreCache;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Insertion-ordered cache.
#[derive(Debug)]
pub struct FifoCache<K, V> {
    index: FxHashMap<K, SlotId>,
    order: IntrusiveList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a FIFO cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`try_new`](Self::try_new) for
    /// user-supplied sizes.
    pub fn new(capacity: usize) -> Self {
        match Self::try_new(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        check_capacity(capacity)?;
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: IntrusiveList::with_capacity(capacity),
            capacity,
        })
    }

    /// Returns the entry that will be evicted next.
    pub fn peek_oldest(&self) -> Option<(&K, &V)> {
        self.order.back().map(|entry| (&entry.key, &entry.value))
    }

    fn evict_oldest(&mut self) {
        if let Some(entry) = self.order.pop_back() {
            self.index.remove(&entry.key);
            trace!(policy = "fifo", "evicted oldest entry");
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.order.debug_validate_invariants();
        assert_eq!(self.index.len(), self.order.len());
        assert!(self.index.len() <= self.capacity);
        for (key, &id) in &self.index {
            let entry = self.order.get(id).expect("indexed slot missing");
            assert!(&entry.key == key, "index points at wrong entry");
        }
    }
}

impl<K, V> CoreCache<K, V> for FifoCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            let entry = self.order.get_mut(id);
            debug_assert!(entry.is_some(), "fifo index points at a freed slot");
            let entry = entry?;
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.order.len() >= self.capacity {
            self.evict_oldest();
        }

        let id = self.order.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Result<&V, CacheError> {
        let &id = self.index.get(key).ok_or(CacheError::KeyNotFound)?;
        self.order
            .get(id)
            .map(|entry| &entry.value)
            .ok_or(CacheError::KeyNotFound)
    }

    fn delete(&mut self, key: &K) -> Result<V, CacheError> {
        let id = self.index.remove(key).ok_or(CacheError::KeyNotFound)?;
        self.order
            .remove(id)
            .map(|entry| entry.value)
            .ok_or(CacheError::KeyNotFound)
    }

    fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
