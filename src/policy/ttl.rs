//! # TTL (Time To Live) Cache
//!
//! Entries expire a fixed duration after they were last `set`. Expiry is
//! discovered lazily: a `get` that finds a stale entry removes it and
//! reports [`CacheError::KeyNotFound`]. Nothing runs in the background;
//! [`TtlCache::purge_expired`] sweeps on demand.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                          TtlCache<K, V>                              │
//!   │                                                                      │
//!   │   index: FxHashMap<K, SlotId>                                        │
//!   │        │                                                             │
//!   │        ▼                                                             │
//!   │   order: IntrusiveList<Entry { key, value, deadline }>               │
//!   │                                                                      │
//!   │     head ─► [newest insert] ◄──► ... ◄──► [oldest insert] ◄── tail   │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A re-`set` refreshes the deadline in place; the entry keeps its place in
//! insertion order. A TTL too long to represent as an [`Instant`] stores no
//! deadline and the entry never expires.
//!
//! ## Capacity pressure
//!
//! Inserting a new key into a full cache first reclaims every expired entry.
//! If none were expired the oldest insertion is evicted, as in FIFO.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use cachelab::policy::ttl::TtlCache;
//! use cachelab::traits::CoreCache;
//!
//! let mut cache = TtlCache::new(2, Duration::from_secs(60));
//! cache.set("a", 1);
//! assert_eq!(cache.get(&"a"), Ok(&1));
//! assert!(cache.time_to_live(&"a").is_some());
//! ```
use std::hash::Hash;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::ds::intrusive_list::IntrusiveList;
use crate::ds::slot_arena::SlotId;
use crate::error::{CacheError, ConfigError, check_capacity};
use crate::traits::CoreCache;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    /// `None` when `set time + ttl` overflows `Instant`.
    deadline: Option<Instant>,
}

impl<K, V> Entry<K, V> {
    #[inline]
    fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|deadline| now >= deadline)
    }
}

/// Cache whose entries expire `ttl` after their last `set`.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    index: FxHashMap<K, SlotId>,
    order: IntrusiveList<Entry<K, V>>,
    capacity: usize,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a TTL cache.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` or `ttl` is zero.
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        match Self::try_new(capacity, ttl) {
            Ok(cache) => cache,
            Err(err) => panic!("{err}"),
        }
    }

    pub fn try_new(capacity: usize, ttl: Duration) -> Result<Self, ConfigError> {
        check_capacity(capacity)?;
        if ttl.is_zero() {
            return Err(ConfigError::zero_ttl());
        }
        Ok(Self {
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: IntrusiveList::with_capacity(capacity),
            capacity,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Remaining life of `key`, `None` if absent or already expired.
    ///
    /// An entry that never expires reports [`Duration::MAX`].
    pub fn time_to_live(&self, key: &K) -> Option<Duration> {
        self.time_to_live_at(key, Instant::now())
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn purge_expired(&mut self) -> usize {
        let removed = self.purge_expired_at(Instant::now());
        debug!(removed, "purged expired ttl entries");
        removed
    }

    pub(crate) fn time_to_live_at(&self, key: &K, now: Instant) -> Option<Duration> {
        let &id = self.index.get(key)?;
        let entry = self.order.get(id)?;
        if entry.is_expired(now) {
            return None;
        }
        Some(
            entry
                .deadline
                .map_or(Duration::MAX, |deadline| deadline.duration_since(now)),
        )
    }

    pub(crate) fn purge_expired_at(&mut self, now: Instant) -> usize {
        // deadlines are not ordered along the list once keys are re-set
        let expired: Vec<K> = self
            .order
            .iter()
            .filter(|entry| entry.is_expired(now))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &expired {
            if let Some(id) = self.index.remove(key) {
                self.order.remove(id);
            }
        }
        expired.len()
    }

    pub(crate) fn set_at(&mut self, key: K, value: V, now: Instant) -> Option<V> {
        let deadline = now.checked_add(self.ttl);

        if let Some(&id) = self.index.get(&key) {
            let entry = self.order.get_mut(id);
            debug_assert!(entry.is_some(), "ttl index points at a freed slot");
            let entry = entry?;
            entry.deadline = deadline;
            return Some(std::mem::replace(&mut entry.value, value));
        }

        if self.order.len() >= self.capacity {
            let reclaimed = self.purge_expired_at(now);
            if reclaimed > 0 {
                trace!(policy = "ttl", reclaimed, "reclaimed expired entries to make room");
            } else if let Some(entry) = self.order.pop_back() {
                self.index.remove(&entry.key);
                trace!(policy = "ttl", "evicted oldest insertion");
            }
        }

        let id = self.order.push_front(Entry {
            key: key.clone(),
            value,
            deadline,
        });
        self.index.insert(key, id);
        None
    }

    pub(crate) fn get_at(&mut self, key: &K, now: Instant) -> Result<&V, CacheError> {
        let &id = self.index.get(key).ok_or(CacheError::KeyNotFound)?;
        let expired = self
            .order
            .get(id)
            .map(|entry| entry.is_expired(now))
            .ok_or(CacheError::KeyNotFound)?;

        if expired {
            self.index.remove(key);
            self.order.remove(id);
            trace!(policy = "ttl", "expired entry on read");
            return Err(CacheError::KeyNotFound);
        }

        self.order
            .get(id)
            .map(|entry| &entry.value)
            .ok_or(CacheError::KeyNotFound)
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

    #[cfg(test)]
    fn keys_oldest_first(&self) -> Vec<K> {
        let mut keys: Vec<K> = self.order.iter().map(|entry| entry.key.clone()).collect();
        keys.reverse();
        keys
    }
}

impl<K, V> CoreCache<K, V> for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
{
    fn set(&mut self, key: K, value: V) -> Option<V> {
        self.set_at(key, value, Instant::now())
    }

    fn get(&mut self, key: &K) -> Result<&V, CacheError> {
        self.get_at(key, Instant::now())
    }

    /// Removes `key` whether or not it has expired.
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

    /// Reports residency only; an expired entry not yet reclaimed counts.
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

    const TTL: Duration = Duration::from_millis(100);

    mod expiry {
        use super::*;

        #[test]
        fn test_entry_expires_at_deadline() {
            let mut cache = TtlCache::new(4, TTL);
            let start = Instant::now();
            cache.set_at("a", 1, start);

            assert_eq!(cache.get_at(&"a", start + Duration::from_millis(99)), Ok(&1));
            assert_eq!(
                cache.get_at(&"a", start + TTL),
                Err(CacheError::KeyNotFound)
            );
            assert!(!cache.contains(&"a"));
            assert!(cache.is_empty());
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_get_does_not_extend_life() {
            let mut cache = TtlCache::new(4, TTL);
            let start = Instant::now();
            cache.set_at("a", 1, start);

            cache.get_at(&"a", start + Duration::from_millis(80)).unwrap();
            assert!(cache.get_at(&"a", start + Duration::from_millis(120)).is_err());
        }

        #[test]
        fn test_set_refreshes_deadline() {
            let mut cache = TtlCache::new(4, TTL);
            let start = Instant::now();
            cache.set_at("a", 1, start);
            cache.set_at("b", 2, start + Duration::from_millis(10));
            assert_eq!(
                cache.set_at("a", 11, start + Duration::from_millis(50)),
                Some(1)
            );
            cache.debug_validate_invariants();

            let later = start + Duration::from_millis(120);
            assert_eq!(cache.get_at(&"a", later), Ok(&11));
            assert!(cache.get_at(&"b", later).is_err());
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_time_to_live_counts_down() {
            let mut cache = TtlCache::new(4, TTL);
            let start = Instant::now();
            cache.set_at("a", 1, start);

            assert_eq!(
                cache.time_to_live_at(&"a", start + Duration::from_millis(30)),
                Some(Duration::from_millis(70))
            );
            assert_eq!(cache.time_to_live_at(&"a", start + TTL), None);
            assert_eq!(cache.time_to_live_at(&"missing", start), None);
        }

        #[test]
        fn test_delete_expired_entry_succeeds() {
            let mut cache = TtlCache::new(4, TTL);
            let start = Instant::now();
            cache.set_at("a", 1, start);
            assert_eq!(cache.time_to_live_at(&"a", start + TTL), None);
            assert!(cache.contains(&"a"));
            assert_eq!(cache.delete(&"a"), Ok(1));
            assert_eq!(cache.delete(&"a"), Err(CacheError::KeyNotFound));
        }
    }

    mod purge {
        use super::*;

        #[test]
        fn test_purge_removes_only_expired() {
            let mut cache = TtlCache::new(4, TTL);
            let start = Instant::now();
            cache.set_at("a", 1, start);
            cache.set_at("b", 2, start + Duration::from_millis(40));
            cache.set_at("c", 3, start + Duration::from_millis(80));

            let removed = cache.purge_expired_at(start + Duration::from_millis(150));
            assert_eq!(removed, 2);
            assert!(cache.contains(&"c"));
            assert_eq!(cache.len(), 1);
            cache.debug_validate_invariants();

            assert_eq!(cache.purge_expired_at(start + Duration::from_millis(150)), 0);
        }

        #[test]
        fn test_purge_finds_expired_entries_out_of_insertion_order() {
            let mut cache = TtlCache::new(4, TTL);
            let start = Instant::now();
            cache.set_at("a", 1, start);
            cache.set_at("b", 2, start + Duration::from_millis(10));
            cache.set_at("c", 3, start + Duration::from_millis(20));
            cache.set_at("a", 11, start + Duration::from_millis(60));

            let removed = cache.purge_expired_at(start + Duration::from_millis(125));
            assert_eq!(removed, 2);
            assert!(cache.contains(&"a"));
            assert!(!cache.contains(&"b"));
            assert!(!cache.contains(&"c"));
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_purge_on_fresh_cache() {
            let mut cache: TtlCache<u32, u32> = TtlCache::new(2, Duration::from_secs(60));
            cache.set(1, 1);
            assert_eq!(cache.purge_expired(), 0);
            assert_eq!(cache.len(), 1);
        }
    }

    mod capacity {
        use super::*;

        #[test]
        fn test_full_cache_reclaims_expired_first() {
            let mut cache = TtlCache::new(3, TTL);
            let start = Instant::now();
            cache.set_at("a", 1, start);
            cache.set_at("b", 2, start + Duration::from_millis(90));
            cache.set_at("c", 3, start + Duration::from_millis(95));

            cache.set_at("d", 4, start + Duration::from_millis(100));
            assert!(!cache.contains(&"a"));
            assert!(cache.contains(&"b"));
            assert!(cache.contains(&"c"));
            assert!(cache.contains(&"d"));
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_full_cache_evicts_oldest_insertion() {
            let mut cache = TtlCache::new(2, Duration::from_secs(60));
            let start = Instant::now();
            cache.set_at("a", 1, start);
            cache.set_at("b", 2, start + Duration::from_millis(10));
            // re-set refreshes the deadline but is not a new insertion
            assert_eq!(cache.set_at("a", 10, start + Duration::from_millis(20)), Some(1));
            assert_eq!(cache.keys_oldest_first(), vec!["a", "b"]);

            cache.set_at("c", 3, start + Duration::from_millis(30));
            assert!(!cache.contains(&"a"));
            assert!(cache.contains(&"b"));
            assert!(cache.contains(&"c"));
            assert_eq!(cache.keys_oldest_first(), vec!["b", "c"]);
            cache.debug_validate_invariants();
        }

        #[test]
        fn test_reclaim_skips_refreshed_oldest_insertion() {
            let mut cache = TtlCache::new(2, TTL);
            let start = Instant::now();
            cache.set_at("a", 1, start);
            cache.set_at("b", 2, start + Duration::from_millis(10));
            cache.set_at("a", 11, start + Duration::from_millis(50));

            // b expired, a (oldest insertion) still live
            cache.set_at("c", 3, start + Duration::from_millis(120));
            assert!(cache.contains(&"a"));
            assert!(!cache.contains(&"b"));
            assert!(cache.contains(&"c"));
            cache.debug_validate_invariants();
        }
    }

    mod config {
        use super::*;

        #[test]
        fn test_rejects_zero_ttl_and_capacity() {
            let err = TtlCache::<u8, u8>::try_new(1, Duration::ZERO).unwrap_err();
            assert!(err.message().contains("ttl"));
            let err = TtlCache::<u8, u8>::try_new(0, TTL).unwrap_err();
            assert!(err.message().contains("capacity"));
        }

        #[test]
        fn test_unrepresentable_ttl_never_expires() {
            for ttl in [Duration::MAX, Duration::from_secs(u64::MAX)] {
                let mut cache = TtlCache::new(2, ttl);
                let start = Instant::now();
                assert_eq!(cache.set_at("a", 1, start), None);
                assert_eq!(cache.set_at("a", 2, start), Some(1));
                cache.set("b", 3);

                assert_eq!(cache.time_to_live_at(&"a", start), Some(Duration::MAX));
                let later = start + Duration::from_secs(10 * 365 * 24 * 3600);
                assert_eq!(cache.get_at(&"a", later), Ok(&2));
                assert_eq!(cache.purge_expired_at(later), 0);

                cache.set("c", 4);
                assert!(!cache.contains(&"a"));
                assert_eq!(cache.len(), 2);
                cache.debug_validate_invariants();
            }
        }

        #[test]
        fn test_clear_keeps_ttl() {
            let mut cache = TtlCache::new(2, TTL);
            cache.set("a", 1);
            cache.clear();
            cache.clear();
            assert!(cache.is_empty());
            assert_eq!(cache.ttl(), TTL);
        }
    }
}
