//! cachelab: capacity-bounded in-memory caches with interchangeable
//! eviction policies.
//!
//! Five engines (FIFO, LRU, LFU, TTL, ARC) implement one contract,
//! [`traits::CoreCache`], and can be used directly from a single thread.
//! [`builder::Cache`] wraps any of them behind a lock for shared use.
//!
//! ```
//! use std::time::Duration;
//! use cachelab::prelude::*;
//!
//! let cache: Cache<&str, u32> = Cache::ttl(128, Duration::from_secs(30)).unwrap();
//! cache.set("answer", 42);
//! assert_eq!(cache.get(&"answer"), Ok(42));
//! assert_eq!(cache.delete(&"missing"), Err(KEY_NOT_FOUND));
//! ```

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
