//! Unified cache builder and thread-safe facade for all eviction policies.
//!
//! [`CacheBuilder`] validates the configuration once and picks the engine;
//! [`Cache`] then routes every call to that engine inside a single
//! `parking_lot::Mutex`, so concurrent callers see fully serialized
//! operations. The engine is fixed for the lifetime of the cache.
//!
//! ## Example
//!
//! ```rust
//! use cachelab::builder::{CacheBuilder, CachePolicy};
//! use cachelab::error::CacheError;
//!
//! let cache = CacheBuilder::new(100)
//!     .build::<u64, String>(CachePolicy::Lru)
//!     .unwrap();
//! cache.set(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Ok("hello".to_string()));
//! assert_eq!(cache.get(&2), Err(CacheError::KeyNotFound));
//! ```

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{CacheError, ConfigError};
#[cfg(feature = "metrics")]
use crate::metrics::{
    metrics_impl::CacheMetrics, snapshot::CacheMetricsSnapshot, traits::CoreMetricsRecorder,
};
use crate::policy::arc::ArcCache;
use crate::policy::fifo::FifoCache;
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::policy::ttl::TtlCache;
use crate::traits::CoreCache;

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// First In, First Out eviction.
    Fifo,
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction, oldest first on ties.
    Lfu,
    /// Entries expire `ttl` after their last `set`.
    Ttl { ttl: Duration },
    /// Adaptive Replacement Cache.
    Arc,
}

impl CachePolicy {
    /// Short lowercase name, used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            CachePolicy::Fifo => "fifo",
            CachePolicy::Lru => "lru",
            CachePolicy::Lfu => "lfu",
            CachePolicy::Ttl { .. } => "ttl",
            CachePolicy::Arc => "arc",
        }
    }
}

impl fmt::Display for CachePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

enum CacheInner<K, V> {
    Fifo(FifoCache<K, V>),
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
    Ttl(TtlCache<K, V>),
    Arc(ArcCache<K, V>),
}

impl<K, V> CacheInner<K, V>
where
    K: Eq + Hash + Clone,
{
    fn as_core(&self) -> &dyn CoreCache<K, V> {
        match self {
            CacheInner::Fifo(fifo) => fifo,
            CacheInner::Lru(lru) => lru,
            CacheInner::Lfu(lfu) => lfu,
            CacheInner::Ttl(ttl) => ttl,
            CacheInner::Arc(arc) => arc,
        }
    }

    fn as_core_mut(&mut self) -> &mut dyn CoreCache<K, V> {
        match self {
            CacheInner::Fifo(fifo) => fifo,
            CacheInner::Lru(lru) => lru,
            CacheInner::Lfu(lfu) => lfu,
            CacheInner::Ttl(ttl) => ttl,
            CacheInner::Arc(arc) => arc,
        }
    }
}

struct Shared<K, V> {
    engine: CacheInner<K, V>,
    #[cfg(feature = "metrics")]
    metrics: CacheMetrics,
}

/// Thread-safe cache with a fixed eviction policy.
///
/// Values are cloned out on `get`, since a reference cannot outlive the lock.
/// `Cache<K, V>` is `Send + Sync` when `K` and `V` are `Send`.
pub struct Cache<K, V> {
    shared: Mutex<Shared<K, V>>,
    policy: CachePolicy,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// FIFO cache with room for `capacity` entries.
    pub fn fifo(capacity: usize) -> Result<Self, ConfigError> {
        CacheBuilder::new(capacity).build(CachePolicy::Fifo)
    }

    /// LRU cache with room for `capacity` entries.
    pub fn lru(capacity: usize) -> Result<Self, ConfigError> {
        CacheBuilder::new(capacity).build(CachePolicy::Lru)
    }

    /// LFU cache with room for `capacity` entries.
    pub fn lfu(capacity: usize) -> Result<Self, ConfigError> {
        CacheBuilder::new(capacity).build(CachePolicy::Lfu)
    }

    /// TTL cache with room for `capacity` entries, each living `ttl`.
    pub fn ttl(capacity: usize, ttl: Duration) -> Result<Self, ConfigError> {
        CacheBuilder::new(capacity).build(CachePolicy::Ttl { ttl })
    }

    /// ARC cache with room for `capacity` resident entries.
    pub fn arc(capacity: usize) -> Result<Self, ConfigError> {
        CacheBuilder::new(capacity).build(CachePolicy::Arc)
    }

    fn from_engine(engine: CacheInner<K, V>, policy: CachePolicy) -> Self {
        Self {
            shared: Mutex::new(Shared {
                engine,
                #[cfg(feature = "metrics")]
                metrics: CacheMetrics::new(),
            }),
            policy,
        }
    }

    /// The policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Inserts or updates `key`, returning the previous value if it existed.
    pub fn set(&self, key: K, value: V) -> Option<V> {
        let mut shared = self.shared.lock();
        #[cfg(feature = "metrics")]
        let before = shared.engine.as_core().len();

        let previous = shared.engine.as_core_mut().set(key, value);

        #[cfg(feature = "metrics")]
        {
            let after = shared.engine.as_core().len();
            if previous.is_some() {
                shared.metrics.record_set_update();
            } else {
                shared.metrics.record_set_new();
                let dropped = (before + 1).saturating_sub(after) as u64;
                if dropped > 0 {
                    shared.metrics.record_evictions(dropped);
                }
            }
        }
        previous
    }

    /// Returns a clone of the value for `key`.
    pub fn get(&self, key: &K) -> Result<V, CacheError> {
        let mut shared = self.shared.lock();
        #[cfg(feature = "metrics")]
        let was_resident = shared.engine.as_core().contains(key);

        let result = shared.engine.as_core_mut().get(key).cloned();

        #[cfg(feature = "metrics")]
        {
            if result.is_ok() {
                shared.metrics.record_get_hit();
            } else {
                shared.metrics.record_get_miss();
                if was_resident {
                    shared.metrics.record_expirations(1);
                }
            }
        }
        result
    }

    /// Removes `key`, returning its value.
    pub fn delete(&self, key: &K) -> Result<V, CacheError> {
        let mut shared = self.shared.lock();
        let result = shared.engine.as_core_mut().delete(key);
        #[cfg(feature = "metrics")]
        shared.metrics.record_delete(result.is_ok());
        result
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut shared = self.shared.lock();
        let removed = shared.engine.as_core().len();
        shared.engine.as_core_mut().clear();
        #[cfg(feature = "metrics")]
        shared.metrics.record_clear();
        debug!(policy = self.policy.name(), removed, "cache cleared");
    }

    /// Drops expired entries now. Always 0 for policies without expiry.
    pub fn purge_expired(&self) -> usize {
        let mut shared = self.shared.lock();
        let removed = match &mut shared.engine {
            CacheInner::Ttl(ttl) => ttl.purge_expired(),
            _ => 0,
        };
        #[cfg(feature = "metrics")]
        {
            shared.metrics.record_expirations(removed as u64);
        }
        removed
    }

    /// Checks residency without touching access state.
    pub fn contains(&self, key: &K) -> bool {
        self.shared.lock().engine.as_core().contains(key)
    }

    pub fn len(&self) -> usize {
        self.shared.lock().engine.as_core().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.shared.lock().engine.as_core().capacity()
    }

    /// Copies the current counters and gauges.
    #[cfg(feature = "metrics")]
    pub fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        let shared = self.shared.lock();
        let core = shared.engine.as_core();
        shared.metrics.snapshot_with(core.len(), core.capacity())
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cache")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Build a cache with the specified policy.
    ///
    /// Fails if the capacity is zero, or if a TTL policy carries a zero
    /// duration.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    /// use cachelab::builder::{CacheBuilder, CachePolicy};
    ///
    /// let arc = CacheBuilder::new(64).build::<u64, String>(CachePolicy::Arc);
    /// assert!(arc.is_ok());
    ///
    /// let ttl = CacheBuilder::new(64)
    ///     .build::<u64, String>(CachePolicy::Ttl { ttl: Duration::from_secs(5) });
    /// assert!(ttl.is_ok());
    ///
    /// assert!(CacheBuilder::new(0).build::<u64, String>(CachePolicy::Lru).is_err());
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let capacity = self.capacity;
        let engine = match policy {
            CachePolicy::Fifo => CacheInner::Fifo(FifoCache::try_new(capacity)?),
            CachePolicy::Lru => CacheInner::Lru(LruCache::try_new(capacity)?),
            CachePolicy::Lfu => CacheInner::Lfu(LfuCache::try_new(capacity)?),
            CachePolicy::Ttl { ttl } => CacheInner::Ttl(TtlCache::try_new(capacity, ttl)?),
            CachePolicy::Arc => CacheInner::Arc(ArcCache::try_new(capacity)?),
        };
        debug!(policy = policy.name(), capacity, "cache constructed");
        Ok(Cache::from_engine(engine, policy))
    }
}
