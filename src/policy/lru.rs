//! # LRU (Least Recently Used) Cache
//!
//! Evicts the entry that has gone longest without being read or written.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LruCache<K, V>                              │
//!   │                                                                      │
//!   │   index: FxHashMap<K, SlotId>   ──►   list: IntrusiveList<Entry>     │
//!   │                                                                      │
//!   │     head ─► [MRU] ◄──► ... ◄──► [LRU] ◄── tail                       │
//!   │              ▲                     │                                 │
//!   │   get / set / touch                └─► evicted on overflow           │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every operation is O(1): the index hands back the node's [`SlotId`] and
//! the list splices it to the head without walking.
//!
//! ## Example
//!
//! ```
//! use cachelab::policy::lru::LruCache;
//! use cachelab::traits::CoreCache;
//!
//! let mut cache = LruCache::new(3);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.set("c", 3);
//!
//! cache.get(&"a").unwrap();
//! cache.set("d", 4); // "b" is now least recently used
//!
//! assert!(!cache.contains(&"b"));
//! assert_eq!(cache.peek_lru(), Some((&"c", &3)));
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

/// Recency-ordered cache.
#[derive(Debug)]
pub struct LruCache<K, V> {
    index: FxHashMap<K, SlotId>,
    list: IntrusiveList<Entry<K, V>>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LRU cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
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
            list: IntrusiveList::with_capacity(capacity),
            capacity,
        })
    }

    /// Returns the least recently used entry without touching it.
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.list.back().map(|entry| (&entry.key, &entry.value))
    }

    /// Marks `key` as most recently used without reading it.
    pub fn touch(&mut self, key: &K) -> bool {
        match self.index.get(key) {
            Some(&id) => self.list.move_to_front(id),
            None => false,
        }
    }

    fn evict_lru(&mut self) {
        if let Some(entry) = self.list.pop_back() {
            self.index.remove(&entry.key);
            trace!(policy = "lru", "evicted least recently used entry");
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.list.debug_validate_invariants();
        assert_eq!(self.index.len(), self.list.len());
        assert!(self.index.len() <= self.capacity);
        for (key, &id) in &self.index {
            let entry = self.list.get(id).expect("indexed slot missing");
            assert!(&entry.key == key, "index points at wrong entry");
        }
    }
}

impl<K, V> CoreCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&id) = self.index.get(&key) {
            self.list.move_to_front(id);
            let entry = self.list.get_mut(id);
            debug_assert!(entry.is_some(), "lru index points at a freed slot");
            let entry = entry?;
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.list.len() >= self.capacity {
            self.evict_lru();
        }

        let id = self.list.push_front(Entry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, id);
        None
    }

    fn get(&mut self, key: &K) -> Result<&V, CacheError> {
        let &id = self.index.get(key).ok_or(CacheError::KeyNotFound)?;
        self.list.move_to_front(id);
        self.list
            .get(id)
            .map(|entry| &entry.value)
            .ok_or(CacheError::KeyNotFound)
    }

    fn delete(&mut self, key: &K) -> Result<V, CacheError> {
        let id = self.index.remove(key).ok_or(CacheError::KeyNotFound)?;
        self.list
            .remove(id)
            .map(|entry| entry.value)
            .ok_or(CacheError::KeyNotFound)
    }

    fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
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
