//! # Cache Contract
//!
//! Every eviction policy in this crate implements [`CoreCache`], so code that
//! only needs "a bounded cache" can be written once and handed any engine.
//!
//! ## Architecture
//!
//! ```text
//!                   ┌─────────────────────────────────────────────┐
//!                   │               CoreCache<K, V>               │
//!                   │                                             │
//!                   │  set(&mut, K, V) → Option<V>                │
//!                   │  get(&mut, &K) → Result<&V, CacheError>     │
//!                   │  delete(&mut, &K) → Result<V, CacheError>   │
//!                   │  clear(&mut)                                │
//!                   │  contains(&, &K) → bool                     │
//!                   │  len(&) / is_empty(&) / capacity(&)         │
//!                   └──────────────────────┬──────────────────────┘
//!                                          │
//!        ┌──────────────┬──────────────┬───┴──────────┬──────────────┐
//!        ▼              ▼              ▼              ▼              ▼
//!   ┌─────────┐    ┌─────────┐    ┌─────────┐    ┌─────────┐    ┌─────────┐
//!   │  FIFO   │    │   LRU   │    │   LFU   │    │   TTL   │    │   ARC   │
//!   └─────────┘    └─────────┘    └─────────┘    └─────────┘    └─────────┘
//! ```
//!
//! ## Policy Comparison
//!
//! | Policy | Eviction Basis               | `get` side effect           |
//! |--------|------------------------------|-----------------------------|
//! | FIFO   | Insertion order              | none                        |
//! | LRU    | Last access time             | move to MRU                 |
//! | LFU    | Access count, then age       | frequency + 1               |
//! | TTL    | Expiry, then insertion order | lazy expiry check           |
//! | ARC    | Adaptive recency/frequency   | T1 → T2 promotion           |
//!
//! ## Thread Safety
//!
//! Engines take `&mut self` and are not synchronized. Share one across
//! threads through [`Cache`](crate::builder::Cache), which serializes every
//! call behind a single lock.

use crate::error::CacheError;

/// Core cache operations that all caches support.
///
/// # Type Parameters
///
/// - `K`: Key type (implementations require `Eq + Hash + Clone`)
/// - `V`: Value type, opaque to the cache
///
/// # Example
///
/// ```
/// use cachelab::traits::CoreCache;
/// use cachelab::policy::lru::LruCache;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.set(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCache::new(100);
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts or updates `key`, returning the previous value if it existed.
    ///
    /// If the key is new and the cache is full, exactly one entry is evicted
    /// according to the policy before the new entry is inserted.
    ///
    /// # Example
    ///
    /// ```
    /// use cachelab::traits::CoreCache;
    /// use cachelab::policy::fifo::FifoCache;
    ///
    /// let mut cache = FifoCache::new(10);
    /// assert_eq!(cache.set(1, "first"), None);
    /// assert_eq!(cache.set(1, "second"), Some("first"));
    /// ```
    fn set(&mut self, key: K, value: V) -> Option<V>;

    /// Looks up `key`, applying the policy's access bookkeeping on a hit.
    ///
    /// Fails with [`CacheError::KeyNotFound`] when the key is absent or, for
    /// time-bounded caches, expired.
    ///
    /// # Example
    ///
    /// ```
    /// use cachelab::error::CacheError;
    /// use cachelab::traits::CoreCache;
    /// use cachelab::policy::lfu::LfuCache;
    ///
    /// let mut cache = LfuCache::new(10);
    /// cache.set(1, "value");
    ///
    /// assert_eq!(cache.get(&1), Ok(&"value"));
    /// assert_eq!(cache.get(&99), Err(CacheError::KeyNotFound));
    /// ```
    fn get(&mut self, key: &K) -> Result<&V, CacheError>;

    /// Removes `key` and all of its bookkeeping, returning the value.
    ///
    /// # Example
    ///
    /// ```
    /// use cachelab::traits::CoreCache;
    /// use cachelab::policy::arc::ArcCache;
    ///
    /// let mut cache = ArcCache::new(10);
    /// cache.set(1, "value");
    ///
    /// assert_eq!(cache.delete(&1), Ok("value"));
    /// assert!(cache.delete(&1).is_err());
    /// ```
    fn delete(&mut self, key: &K) -> Result<V, CacheError>;

    /// Removes all entries. Calling it on an empty cache is a no-op.
    fn clear(&mut self);

    /// Checks residency without touching access state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries in the cache.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum number of entries.
    fn capacity(&self) -> usize;
}
