//! # Metrics Traits
//!
//! Recording and snapshotting are kept apart: the facade only writes through
//! [`CoreMetricsRecorder`], and readers only see the copy handed out by
//! [`MetricsSnapshotProvider`].
//!
//! ```text
//!   Cache::set/get/delete/clear
//!              │
//!              ▼
//!   ┌──────────────────────┐   snapshot()   ┌──────────────────────────┐
//!   │ CoreMetricsRecorder  │ ─────────────► │ MetricsSnapshotProvider  │
//!   │ (CacheMetrics)       │                │ → CacheMetricsSnapshot   │
//!   └──────────────────────┘                └──────────────────────────┘
//! ```

/// Common counters for any cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_set_new(&mut self);
    fn record_set_update(&mut self);
    fn record_evictions(&mut self, count: u64);
    fn record_expirations(&mut self, count: u64);
    fn record_delete(&mut self, hit: bool);
    fn record_clear(&mut self);
}

/// Produces a point-in-time copy of the counters.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
