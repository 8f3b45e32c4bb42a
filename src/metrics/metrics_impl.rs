use crate::metrics::snapshot::CacheMetricsSnapshot;
use crate::metrics::traits::{CoreMetricsRecorder, MetricsSnapshotProvider};

/// Counters owned by the facade and updated under its lock.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,
    pub set_calls: u64,
    pub set_new: u64,
    pub set_updates: u64,
    pub evictions: u64,
    pub expirations: u64,
    pub delete_calls: u64,
    pub delete_hits: u64,
    pub clear_calls: u64,
}

impl CacheMetrics {
    pub fn new() -> CacheMetrics {
        Self::default()
    }

    /// Snapshot with the caller's gauges filled in.
    pub fn snapshot_with(&self, len: usize, capacity: usize) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            len,
            capacity,
            ..self.snapshot()
        }
    }
}

impl CoreMetricsRecorder for CacheMetrics {
    #[inline]
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    #[inline]
    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    #[inline]
    fn record_set_new(&mut self) {
        self.set_calls += 1;
        self.set_new += 1;
    }

    #[inline]
    fn record_set_update(&mut self) {
        self.set_calls += 1;
        self.set_updates += 1;
    }

    #[inline]
    fn record_evictions(&mut self, count: u64) {
        self.evictions += count;
    }

    #[inline]
    fn record_expirations(&mut self, count: u64) {
        self.expirations += count;
    }

    #[inline]
    fn record_delete(&mut self, hit: bool) {
        self.delete_calls += 1;
        if hit {
            self.delete_hits += 1;
        }
    }

    #[inline]
    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}

impl MetricsSnapshotProvider<CacheMetricsSnapshot> for CacheMetrics {
    fn snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            get_calls: self.get_calls,
            get_hits: self.get_hits,
            get_misses: self.get_misses,
            set_calls: self.set_calls,
            set_new: self.set_new,
            set_updates: self.set_updates,
            evictions: self.evictions,
            expirations: self.expirations,
            delete_calls: self.delete_calls,
            delete_hits: self.delete_hits,
            clear_calls: self.clear_calls,
            len: 0,
            capacity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_calls_and_outcomes() {
        let mut metrics = CacheMetrics::new();
        metrics.record_get_hit();
        metrics.record_get_miss();
        metrics.record_set_new();
        metrics.record_set_update();
        metrics.record_evictions(2);
        metrics.record_expirations(1);
        metrics.record_delete(true);
        metrics.record_delete(false);
        metrics.record_clear();

        let snapshot = metrics.snapshot_with(3, 8);
        assert_eq!(snapshot.get_calls, 2);
        assert_eq!(snapshot.get_hits, 1);
        assert_eq!(snapshot.get_misses, 1);
        assert_eq!(snapshot.set_calls, 2);
        assert_eq!(snapshot.evictions, 2);
        assert_eq!(snapshot.expirations, 1);
        assert_eq!(snapshot.delete_calls, 2);
        assert_eq!(snapshot.delete_hits, 1);
        assert_eq!(snapshot.clear_calls, 1);
        assert_eq!(snapshot.len, 3);
        assert_eq!(snapshot.capacity, 8);
    }
}
