/// Point-in-time copy of a [`Cache`](crate::builder::Cache)'s counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub set_calls: u64,
    pub set_new: u64,
    pub set_updates: u64,

    pub evictions: u64,
    pub expirations: u64, // ttl entries dropped lazily or by purge

    pub delete_calls: u64,
    pub delete_hits: u64,

    pub clear_calls: u64,

    // gauges captured at snapshot time
    pub len: usize,
    pub capacity: usize,
}

impl CacheMetricsSnapshot {
    /// Fraction of `get` calls that hit, `0.0` before the first call.
    pub fn hit_ratio(&self) -> f64 {
        if self.get_calls == 0 {
            return 0.0;
        }
        self.get_hits as f64 / self.get_calls as f64
    }
}
