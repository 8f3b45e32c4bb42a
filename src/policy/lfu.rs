//! # LFU (Least Frequently Used) Cache
//!
//! Evicts the entry with the smallest access count. Among entries that share
//! the smallest count, the one that reached that count earliest goes first.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          LfuCache<K, V>                              │
//!   │                                                                      │
//!   │   values: FxHashMap<K, V>         freq: FrequencyBuckets<K>          │
//!   │   ┌─────────┬───────┐             min_freq ─► 1: [c] ◄──► [b]        │
//!   │   │ a       │  ...  │                         4: [a]                 │
//!   │   │ b       │  ...  │                                                │
//!   │   │ c       │  ...  │             eviction pops the tail of the      │
//!   │   └─────────┴───────┘             min_freq bucket (here "b")         │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frequency Lifecycle
//!
//! - `set` of a new key starts it at 1.
//! - `get` hits and `set` updates each add 1.
//! - `delete`, eviction and `clear` drop the count with the entry.
//!
//! ## Example
//!
//! ```
//! use cachelab::policy::lfu::LfuCache;
//! use cachelab::traits::CoreCache;
//!
//! let mut cache = LfuCache::new(3);
//! cache.set("a", 1);
//! cache.set("b", 2);
//! cache.set("c", 3);
//! for _ in 0..3 {
//!     cache.get(&"a").unwrap();
//! }
//! cache.get(&"b").unwrap();
//!
//! cache.set("d", 4);
//! assert!(!cache.contains(&"c"));
//! assert_eq!(cache.frequency(&"a"), Some(4));
//! ```
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::frequency_buckets::FrequencyBuckets;
use crate::error::{CacheError, ConfigError, check_capacity};
use crate::traits::CoreCache;

/// Frequency-ordered cache backed by [`FrequencyBuckets`].
#[derive(Debug)]
pub struct LfuCache<K, V> {
    values: FxHashMap<K, V>,
    freq: FrequencyBuckets<K>,
    capacity: usize,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an LFU cache holding at most `capacity` entries.
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
            values: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            freq: FrequencyBuckets::with_capacity(capacity),
            capacity,
        })
    }

    /// Current access count of `key`, `None` if not resident.
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.freq.frequency(key)
    }

    fn evict_lfu(&mut self) {
        if let Some((key, freq)) = self.freq.pop_min() {
            self.values.remove(&key);
            trace!(policy = "lfu", freq, "evicted least frequently used entry");
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.freq.debug_validate_invariants();
        assert_eq!(self.values.len(), self.freq.len());
        assert!(self.values.len() <= self.capacity);
        for key in self.values.keys() {
            assert!(self.freq.contains(key), "value without frequency entry");
        }
    }
}

impl<K, V> CoreCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some(slot) = self.values.get_mut(&key) {
            let previous = std::mem::replace(slot, value);
            self.freq.touch(&key);
            return Some(previous);
        }

        if self.values.len() >= self.capacity {
            self.evict_lfu();
        }

        self.freq.insert(key.clone());
        self.values.insert(key, value);
        None
    }

    fn get(&mut self, key: &K) -> Result<&V, CacheError> {
        if !self.values.contains_key(key) {
            return Err(CacheError::KeyNotFound);
        }
        self.freq.touch(key);
        self.values.get(key).ok_or(CacheError::KeyNotFound)
    }

    fn delete(&mut self, key: &K) -> Result<V, CacheError> {
        let value = self.values.remove(key).ok_or(CacheError::KeyNotFound)?;
        self.freq.remove(key);
        Ok(value)
    }

    fn clear(&mut self) {
        self.values.clear();
        self.freq.clear();
    }

    fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod basic_behavior {
        use super::*;

        #[test]
        fn test_frequency_counts_gets_and_updates() {
            let mut cache = LfuCache::new(3);
            cache.set("a", 1);
            assert_eq!(cache.frequency(&"a"), Some(1));

            cache.get(&"a").unwrap();
            assert_eq!(cache.frequency(&"a"), Some(2));

            assert_eq!(cache.set("a", 10), Some(1));
            assert_eq!(cache.frequency(&"a"), Some(3));
            assert_eq!(cache.get(&"a"), Ok(&10));
            assert_eq!(cache.frequency(&"missing"), None);
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_miss_does_not_create_frequency() {
            let mut cache: LfuCache<&str, i32> = LfuCache::new(2);
            assert_eq!(cache.get(&"ghost"), Err(CacheError::KeyNotFound));
            assert_eq!(cache.frequency(&"ghost"), None);
            assert!(cache.is_empty());
        }
    }

    mod eviction {
        use super::*;

        #[test]
        fn test_evicts_lowest_frequency() {
            let mut cache = LfuCache::new(3);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.set("c", 3);
            for _ in 0..3 {
                cache.get(&"a").unwrap();
            }
            cache.get(&"b").unwrap();

            cache.set("d", 4);
            assert!(cache.contains(&"a"));
            assert!(cache.contains(&"b"));
            assert!(!cache.contains(&"c"));
            assert!(cache.contains(&"d"));
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_ties_evict_oldest_insertion() {
            let mut cache = LfuCache::new(3);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.set("c", 3);

            cache.set("d", 4);
            assert!(!cache.contains(&"a"));

            cache.set("e", 5);
            assert!(!cache.contains(&"b"));
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_new_entry_can_be_next_victim() {
            let mut cache = LfuCache::new(2);
            cache.set("hot", 1);
            cache.get(&"hot").unwrap();
            cache.set("x", 2);
            cache.set("y", 3);

            assert!(cache.contains(&"hot"));
            assert!(!cache.contains(&"x"));
            assert!(cache.contains(&"y"));
        }
    }

    mod removal {
        use super::*;

        #[test]
        fn test_delete_drops_frequency() {
            let mut cache = LfuCache::new(2);
            cache.set("a", 1);
            cache.get(&"a").unwrap();

            assert_eq!(cache.delete(&"a"), Ok(1));
            assert_eq!(cache.frequency(&"a"), None);
            assert_eq!(cache.delete(&"a"), Err(CacheError::KeyNotFound));

            cache.set("a", 2);
            assert_eq!(cache.frequency(&"a"), Some(1));
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_clear_resets_everything() {
            let mut cache = LfuCache::new(2);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.frequency(&"a"), None);
            cache.debug_validate_invariants();
        }
    }
}
