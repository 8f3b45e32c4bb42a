//! Eviction policy engines.
//!
//! Each engine is a single-threaded [`CoreCache`](crate::traits::CoreCache)
//! implementation that owns its bookkeeping structures. Wrap one in
//! [`Cache`](crate::builder::Cache) to share it across threads.
//!
//! | Module | Engine      | Evicts                                   |
//! |--------|-------------|------------------------------------------|
//! | `fifo` | `FifoCache` | earliest insertion                       |
//! | `lru`  | `LruCache`  | least recently used                      |
//! | `lfu`  | `LfuCache`  | lowest access count, oldest on ties      |
//! | `ttl`  | `TtlCache`  | expired entries, then earliest insertion |
//! | `arc`  | `ArcCache`  | adaptive T1/T2 split with ghost lists    |
pub mod arc;
pub mod fifo;
pub mod lfu;
pub mod lru;
pub mod ttl;
