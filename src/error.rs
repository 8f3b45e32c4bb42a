//! Error types for the cachelab library.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by `get` and `delete` when a key is not
//!   resident. Shared by every policy so callers match on one value.
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (zero capacity, zero TTL).
//!
//! ## Example Usage
//!
//! ```
//! use cachelab::error::{CacheError, ConfigError};
//! use cachelab::policy::lru::LruCache;
//! use cachelab::traits::CoreCache;
//!
//! let mut cache: LruCache<&str, i32> = LruCache::new(2);
//! assert_eq!(cache.get(&"missing"), Err(CacheError::KeyNotFound));
//!
//! let bad: Result<LruCache<&str, i32>, ConfigError> = LruCache::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Error returned by lookups and removals.
///
/// A key that was never inserted, was deleted, was evicted, or has expired
/// all produce the same [`CacheError::KeyNotFound`]; the caller cannot and
/// need not tell them apart.
///
/// # Example
///
/// ```
/// use cachelab::error::{CacheError, KEY_NOT_FOUND};
/// use cachelab::policy::fifo::FifoCache;
/// use cachelab::traits::CoreCache;
///
/// let mut cache: FifoCache<u32, u32> = FifoCache::new(1);
/// let err = cache.delete(&7).unwrap_err();
/// assert_eq!(err, KEY_NOT_FOUND);
/// assert!(matches!(err, CacheError::KeyNotFound));
/// assert_eq!(err.to_string(), "key not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheError {
    /// The key is not resident in the cache.
    KeyNotFound,
}

/// Named alias for [`CacheError::KeyNotFound`].
pub const KEY_NOT_FOUND: CacheError = CacheError::KeyNotFound;

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::KeyNotFound => f.write_str("key not found"),
        }
    }
}

impl std::error::Error for CacheError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by the `try_new` constructors and by
/// [`CacheBuilder::build`](crate::builder::CacheBuilder::build). Carries a
/// human-readable description naming the parameter that failed validation.
///
/// # Example
///
/// ```
/// use cachelab::policy::ttl::TtlCache;
/// use std::time::Duration;
///
/// let err = TtlCache::<u64, u64>::try_new(0, Duration::from_secs(1)).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
///
/// let err = TtlCache::<u64, u64>::try_new(8, Duration::ZERO).unwrap_err();
/// assert!(err.to_string().contains("ttl"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }

    pub(crate) fn zero_capacity() -> Self {
        Self::new("capacity must be greater than zero")
    }

    pub(crate) fn zero_ttl() -> Self {
        Self::new("ttl must be greater than zero")
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

/// Fails with [`ConfigError`] when `capacity` is zero.
pub(crate) fn check_capacity(capacity: usize) -> Result<(), ConfigError> {
    if capacity == 0 {
        return Err(ConfigError::zero_capacity());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
