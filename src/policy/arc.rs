//! Adaptive Replacement Cache (ARC) replacement policy.
//!
//! Balances recency against frequency by splitting residents into two lists
//! and remembering recently evicted keys in two ghost lists. Hits on a ghost
//! move the target size `p` of the recency side, so the cache drifts towards
//! whichever half has been losing useful entries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                            ArcCache<K, V> Layout                            │
//! │                                                                             │
//! │   index: FxHashMap<K, Slot { list: T1 | T2, id: SlotId }>                   │
//! │                                                                             │
//! │   T1 (seen once)                        T2 (seen at least twice)            │
//! │   ┌─────────────────────────┐           ┌─────────────────────────┐         │
//! │   │ MRU               LRU   │           │ MRU               LRU   │         │
//! │   │ [e] ◄──► [d] ◄──► [c]   │           │ [b] ◄──► [a]            │         │
//! │   └───────────────────┬─────┘           └───────────────────┬─────┘         │
//! │                       │ REPLACE                             │ REPLACE       │
//! │                       ▼                                     ▼               │
//! │   B1 (ghost of T1)                      B2 (ghost of T2)                    │
//! │   ┌─────────────────────────┐           ┌─────────────────────────┐         │
//! │   │ keys only, ≤ capacity   │           │ keys only, ≤ capacity   │         │
//! │   └─────────────────────────┘           └─────────────────────────┘         │
//! │                                                                             │
//! │   p: target size of T1, 0 ≤ p ≤ capacity                                    │
//! │   • hit in B1 → p grows   (recency was evicted too eagerly)                 │
//! │   • hit in B2 → p shrinks (frequency was evicted too eagerly)               │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Event                 | Effect                                              |
//! |-----------------------|-----------------------------------------------------|
//! | hit in T1             | move to MRU of T2                                   |
//! | hit in T2             | move to MRU of T2                                   |
//! | miss, key in B1       | `p += max(1, ⌊B2/B1⌋)`, REPLACE, insert into T2     |
//! | miss, key in B2       | `p -= max(1, ⌊B1/B2⌋)`, REPLACE, insert into T2     |
//! | miss, key unknown     | trim ghosts, REPLACE if full, insert into T1        |
//!
//! A `set` on a resident key counts as a hit. `delete` only sees resident
//! keys; a key that survives solely as a ghost is reported as not found.
//!
//! ## Invariants
//!
//! - `|T1| + |T2| ≤ capacity`
//! - `|T1| + |B1| ≤ capacity`
//! - `|T1| + |T2| + |B1| + |B2| ≤ 2 · capacity`
//! - a key is in at most one of the four lists
//!
//! ## Example
//!
//! ```
//! use cachelab::policy::arc::ArcCache;
//! use cachelab::traits::CoreCache;
//!
//! let mut cache = ArcCache::new(4);
//! for key in ["a", "b", "c", "d"] {
//!     cache.set(key, key.len());
//! }
//! cache.get(&"a").unwrap();
//! cache.get(&"b").unwrap();
//! assert_eq!(cache.t2_len(), 2);
//!
//! cache.set("e", 1);
//! assert!(!cache.contains(&"c"));
//! assert_eq!(cache.b1_len(), 1);
//! ```
use std::hash::Hash;

use rustc_hash::FxHashMap;
use tracing::trace;

use crate::ds::ghost_list::GhostList;
use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::{CacheError, ConfigError, check_capacity};
use crate::traits::CoreCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    T1,
    T2,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    list: ListKind,
    id: SlotId,
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

/// Adaptive Replacement Cache.
#[derive(Debug)]
pub struct ArcCache<K, V> {
    index: FxHashMap<K, Slot>,
    t1: IntrusiveList<Entry<K, V>>,
    t2: IntrusiveList<Entry<K, V>>,
    b1: GhostList<K>,
    b2: GhostList<K>,
    p: usize,
    capacity: usize,
}

impl<K, V> ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an ARC cache holding at most `capacity` resident entries.
    ///
    /// Each ghost list remembers up to `capacity` further keys.
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
            t1: IntrusiveList::with_capacity(capacity),
            t2: IntrusiveList::with_capacity(capacity),
            b1: GhostList::new(capacity),
            b2: GhostList::new(capacity),
            p: 0,
            capacity,
        })
    }

    /// Current target size of T1.
    pub fn p_value(&self) -> usize {
        self.p
    }

    pub fn t1_len(&self) -> usize {
        self.t1.len()
    }

    pub fn t2_len(&self) -> usize {
        self.t2.len()
    }

    pub fn b1_len(&self) -> usize {
        self.b1.len()
    }

    pub fn b2_len(&self) -> usize {
        self.b2.len()
    }

    fn resident_len(&self) -> usize {
        self.t1.len() + self.t2.len()
    }

    /// Moves a resident entry to the MRU end of T2 and returns its new slot.
    fn promote(&mut self, key: &K, slot: Slot) -> Option<SlotId> {
        match slot.list {
            ListKind::T1 => {
                let entry = self.t1.remove(slot.id)?;
                let id = self.t2.push_front(entry);
                if let Some(slot) = self.index.get_mut(key) {
                    *slot = Slot {
                        list: ListKind::T2,
                        id,
                    };
                }
                Some(id)
            },
            ListKind::T2 => {
                self.t2.move_to_front(slot.id);
                Some(slot.id)
            },
        }
    }

    /// Evicts one resident into its ghost list when the resident lists are full.
    fn replace(&mut self, hit_in_b2: bool) {
        if self.resident_len() < self.capacity {
            return;
        }

        let t1_len = self.t1.len();
        // T1 when it exceeds its target, or when T2 has nothing to give
        let from_t1 = (t1_len > 0 && (t1_len > self.p || (hit_in_b2 && t1_len == self.p)))
            || self.t2.is_empty();

        if from_t1 {
            if let Some(entry) = self.t1.pop_back() {
                self.index.remove(&entry.key);
                self.b1.record(entry.key);
                trace!(policy = "arc", list = "t1", "evicted into b1");
            }
        } else if let Some(entry) = self.t2.pop_back() {
            self.index.remove(&entry.key);
            self.b2.record(entry.key);
            trace!(policy = "arc", list = "t2", "evicted into b2");
        }
    }

    fn insert_resident(&mut self, list: ListKind, key: K, value: V) {
        let entry = Entry {
            key: key.clone(),
            value,
        };
        let id = match list {
            ListKind::T1 => self.t1.push_front(entry),
            ListKind::T2 => self.t2.push_front(entry),
        };
        self.index.insert(key, Slot { list, id });
    }

    fn insert_after_b1_hit(&mut self, key: K, value: V) {
        let delta = (self.b2.len() / self.b1.len()).max(1);
        self.p = (self.p + delta).min(self.capacity);
        self.b1.remove(&key);
        self.replace(false);
        self.insert_resident(ListKind::T2, key, value);
    }

    fn insert_after_b2_hit(&mut self, key: K, value: V) {
        let delta = (self.b1.len() / self.b2.len()).max(1);
        self.p -= self.p.min(delta);
        self.b2.remove(&key);
        self.replace(true);
        self.insert_resident(ListKind::T2, key, value);
    }

    fn insert_unknown(&mut self, key: K, value: V) {
        let l1 = self.t1.len() + self.b1.len();
        let total = l1 + self.t2.len() + self.b2.len();

        if l1 >= self.capacity {
            if self.t1.len() < self.capacity {
                self.b1.pop_lru();
                self.replace(false);
            } else if let Some(entry) = self.t1.pop_back() {
                self.index.remove(&entry.key);
                trace!(policy = "arc", list = "t1", "evicted without ghost");
            }
        } else if total >= self.capacity {
            if total >= 2 * self.capacity {
                self.b2.pop_lru();
            }
            self.replace(false);
        }

        self.insert_resident(ListKind::T1, key, value);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.t1.debug_validate_invariants();
        self.t2.debug_validate_invariants();
        self.b1.debug_validate_invariants();
        self.b2.debug_validate_invariants();

        let t1 = self.t1.len();
        let t2 = self.t2.len();
        let b1 = self.b1.len();
        let b2 = self.b2.len();
        assert_eq!(self.index.len(), t1 + t2);
        assert!(t1 + t2 <= self.capacity);
        assert!(t1 + b1 <= self.capacity);
        assert!(t1 + t2 + b1 + b2 <= 2 * self.capacity);
        assert!(self.p <= self.capacity);

        for (key, slot) in &self.index {
            let entry = match slot.list {
                ListKind::T1 => self.t1.get(slot.id),
                ListKind::T2 => self.t2.get(slot.id),
            }
            .expect("indexed slot missing");
            assert!(&entry.key == key, "index points at wrong entry");
            assert!(!self.b1.contains(key), "resident key also in b1");
            assert!(!self.b2.contains(key), "resident key also in b2");
        }
        for key in self.b1.iter() {
            assert!(!self.b2.contains(key), "key in both ghost lists");
        }
    }
}

impl<K, V> CoreCache<K, V> for ArcCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set(&mut self, key: K, value: V) -> Option<V> {
        if let Some(&slot) = self.index.get(&key) {
            let entry = self
                .promote(&key, slot)
                .and_then(|id| self.t2.get_mut(id));
            debug_assert!(entry.is_some(), "arc index points at a freed slot");
            let entry = entry?;
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.b1.contains(&key) {
            self.insert_after_b1_hit(key, value);
        } else if self.b2.contains(&key) {
            self.insert_after_b2_hit(key, value);
        } else {
            self.insert_unknown(key, value);
        }
        None
    }

    fn get(&mut self, key: &K) -> Result<&V, CacheError> {
        let &slot = self.index.get(key).ok_or(CacheError::KeyNotFound)?;
        let id = self.promote(key, slot).ok_or(CacheError::KeyNotFound)?;
        self.t2
            .get(id)
            .map(|entry| &entry.value)
            .ok_or(CacheError::KeyNotFound)
    }

    fn delete(&mut self, key: &K) -> Result<V, CacheError> {
        let slot = self.index.remove(key).ok_or(CacheError::KeyNotFound)?;
        let entry = match slot.list {
            ListKind::T1 => self.t1.remove(slot.id),
            ListKind::T2 => self.t2.remove(slot.id),
        };
        entry.map(|entry| entry.value).ok_or(CacheError::KeyNotFound)
    }

    fn clear(&mut self) {
        self.index.clear();
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.p = 0;
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

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(capacity: usize) -> ArcCache<u32, u32> {
        let mut cache = ArcCache::new(capacity);
        for key in 0..capacity as u32 {
            cache.set(key, key * 10);
        }
        cache
    }

    mod resident_lists {
        use super::*;

        #[test]
        fn test_new_keys_land_in_t1() {
            let cache = filled(3);
            assert_eq!(cache.t1_len(), 3);
            assert_eq!(cache.t2_len(), 0);
            assert_eq!(cache.p_value(), 0);
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_hit_promotes_to_t2() {
            let mut cache = filled(3);
            assert_eq!(cache.get(&1), Ok(&10));
            assert_eq!(cache.t1_len(), 2);
            assert_eq!(cache.t2_len(), 1);

            assert_eq!(cache.get(&1), Ok(&10));
            assert_eq!(cache.t2_len(), 1);
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_set_on_resident_counts_as_hit() {
            let mut cache = filled(3);
            assert_eq!(cache.set(0, 99), Some(0));
            assert_eq!(cache.t2_len(), 1);
            assert_eq!(cache.get(&0), Ok(&99));
            assert_eq!(cache.len(), 3);
            cache.debug_validate_invariants();
        }
    }

    mod replacement {
        use super::*;

        #[test]
        fn test_miss_evicts_t1_lru_into_b1() {
            let mut cache = ArcCache::new(4);
            for key in ["a", "b", "c", "d"] {
                cache.set(key, 0);
            }
            cache.get(&"a").unwrap();
            cache.get(&"b").unwrap();

            cache.set("e", 0);
            assert!(!cache.contains(&"c"));
            for key in ["a", "b", "d", "e"] {
                assert!(cache.contains(&key));
            }
            assert_eq!(cache.b1_len(), 1);
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_b1_hit_grows_p_and_lands_in_t2() {
            let mut cache = ArcCache::new(2);
            cache.set(1, 1);
            cache.set(2, 2);
            cache.get(&2).unwrap();
            cache.set(3, 3); // 1 goes to b1
            assert_eq!(cache.b1_len(), 1);

            // p is now 1, so t1 is not over target and t2's lru (2) goes instead
            cache.set(1, 11);
            assert_eq!(cache.p_value(), 1);
            assert_eq!(cache.b1_len(), 0);
            assert_eq!(cache.b2_len(), 1);
            assert!(cache.contains(&1));
            assert!(!cache.contains(&2));
            assert_eq!(cache.len(), 2);
            cache.debug_validate_invariants();

            let t2_before = cache.t2_len();
            cache.get(&1).unwrap();
            assert_eq!(cache.t2_len(), t2_before);
        }

        #[test]
        fn test_b2_hit_shrinks_p() {
            let mut cache = ArcCache::new(2);
            cache.set(1, 1);
            cache.get(&1).unwrap();
            cache.set(2, 2);
            cache.get(&2).unwrap();
            // both in t2; pushing a new key evicts t2's lru (1) into b2
            cache.set(3, 3);
            assert_eq!(cache.b2_len(), 1);
            assert!(!cache.contains(&1));

            // first raise p through a b1 hit so the b2 hit has room to lower it
            cache.set(4, 4);
            assert!(cache.b1_len() >= 1);
            cache.set(3, 33);
            let p_before = cache.p_value();
            assert!(p_before > 0);

            cache.set(1, 11);
            assert!(cache.p_value() < p_before);
            assert!(cache.contains(&1));
            assert_eq!(cache.len(), 2);
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_b2_hit_with_t1_at_target_evicts_from_t1() {
            let mut cache = ArcCache::new(4);
            for key in ["a", "b", "c", "d"] {
                cache.set(key, 0);
            }
            for key in ["a", "b", "c", "d"] {
                cache.get(&key).unwrap();
            }
            cache.set("e", 0); // a -> b2
            cache.set("f", 0); // e -> b1
            cache.set("e", 0); // b1 hit, p = 1, b -> b2
            cache.set("g", 0); // c -> b2
            cache.set("h", 0); // f -> b1
            cache.set("f", 0); // b1 hit, p = 4, d -> b2
            cache.set("i", 0); // a dropped from b2, e -> b2

            assert_eq!(cache.p_value(), 4);
            assert_eq!((cache.t1_len(), cache.t2_len()), (3, 1));
            assert_eq!((cache.b1_len(), cache.b2_len()), (0, 4));
            assert!(cache.contains(&"f"));
            assert!(cache.contains(&"g"));
            cache.debug_validate_invariants();

            // p drops to 3 == |T1|, so T1's lru goes and T2 keeps "f"
            cache.set("d", 1);
            assert_eq!(cache.p_value(), 3);
            assert!(!cache.contains(&"g"));
            assert!(cache.contains(&"f"));
            assert!(cache.contains(&"d"));
            assert_eq!((cache.t1_len(), cache.t2_len()), (2, 2));
            assert_eq!((cache.b1_len(), cache.b2_len()), (1, 3));
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_capacity_one_cycles() {
            let mut cache = ArcCache::new(1);
            for key in 0..10 {
                cache.set(key, key);
                assert_eq!(cache.len(), 1);
                cache.debug_validate_invariants();
            }
            assert!(cache.contains(&9));
        }
    }

    mod removal {
        use super::*;

        #[test]
        fn test_delete_resident_and_ghost() {
            let mut cache = ArcCache::new(2);
            cache.set("a", 1);
            cache.set("b", 2);
            cache.get(&"b").unwrap();
            cache.set("c", 3); // "a" becomes a ghost
            assert!(!cache.contains(&"a"));
            assert_eq!(cache.b1_len(), 1);

            assert_eq!(cache.delete(&"a"), Err(CacheError::KeyNotFound));
            assert_eq!(cache.delete(&"b"), Ok(2));
            assert_eq!(cache.len(), 1);
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_clear_resets_p_and_ghosts() {
            let mut cache = ArcCache::new(2);
            cache.set(1, 1);
            cache.set(2, 2);
            cache.get(&2).unwrap();
            cache.set(3, 3);
            cache.set(1, 1);
            assert!(cache.p_value() > 0);

            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.p_value(), 0);
            assert_eq!(cache.b1_len() + cache.b2_len(), 0);
            cache.clear();
            cache.debug_validate_invariants();
        }
    }
}
