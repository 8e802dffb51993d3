//! Per-pool metrics.
//!
//! [`PoolMetrics`] is created when a pool is registered and shared (via
//! `Arc`) between the registry, the pool's monitor and any probe callers.
//! Every counter is an independent atomic, so readers never block writers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

/// Live metrics for one registered pool.
#[derive(Debug)]
pub struct PoolMetrics {
    total_allocations: AtomicU64,
    total_deallocations: AtomicU64,
    allocation_failures: AtomicU64,
    peak_memory_usage: AtomicU64,
    startup_time: SystemTime,
}

impl PoolMetrics {
    /// Fresh metrics stamped with the current wall-clock time.
    pub fn new() -> Self {
        Self::with_startup_time(SystemTime::now())
    }

    /// Fresh metrics with an explicit startup time.
    pub fn with_startup_time(startup_time: SystemTime) -> Self {
        Self {
            total_allocations: AtomicU64::new(0),
            total_deallocations: AtomicU64::new(0),
            allocation_failures: AtomicU64::new(0),
            peak_memory_usage: AtomicU64::new(0),
            startup_time,
        }
    }

    /// Count one successful allocation.
    pub fn record_allocation(&self) {
        self.total_allocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one deallocation.
    pub fn record_deallocation(&self) {
        self.total_deallocations.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one failed allocation.
    pub fn record_failure(&self) {
        self.allocation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Raise the peak to `used` if it is higher. Returns the resulting peak.
    pub fn observe_usage(&self, used: u64) -> u64 {
        let prev = self.peak_memory_usage.fetch_max(used, Ordering::AcqRel);
        prev.max(used)
    }

    /// Successful allocations so far.
    pub fn total_allocations(&self) -> u64 {
        self.total_allocations.load(Ordering::Relaxed)
    }

    /// Deallocations so far.
    pub fn total_deallocations(&self) -> u64 {
        self.total_deallocations.load(Ordering::Relaxed)
    }

    /// Failed allocations so far.
    pub fn allocation_failures(&self) -> u64 {
        self.allocation_failures.load(Ordering::Relaxed)
    }

    /// Highest sampled usage in bytes.
    pub fn peak_memory_usage(&self) -> u64 {
        self.peak_memory_usage.load(Ordering::Acquire)
    }

    /// When the pool was registered.
    pub fn startup_time(&self) -> SystemTime {
        self.startup_time
    }

    /// Copy the current values into a serializable snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_allocations: self.total_allocations(),
            total_deallocations: self.total_deallocations(),
            allocation_failures: self.allocation_failures(),
            peak_memory_usage: self.peak_memory_usage(),
            startup_time: self
                .startup_time
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs_f64())
                .unwrap_or(0.0),
        }
    }
}

impl Default for PoolMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain-value copy of [`PoolMetrics`], suitable for persistence.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// Successful allocations.
    pub total_allocations: u64,
    /// Deallocations.
    pub total_deallocations: u64,
    /// Failed allocations.
    pub allocation_failures: u64,
    /// Highest sampled usage in bytes.
    pub peak_memory_usage: u64,
    /// Registration time as seconds since the Unix epoch.
    pub startup_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn default_metrics_are_zero() {
        let m = PoolMetrics::new();
        assert_eq!(m.total_allocations(), 0);
        assert_eq!(m.total_deallocations(), 0);
        assert_eq!(m.allocation_failures(), 0);
        assert_eq!(m.peak_memory_usage(), 0);
    }

    #[test]
    fn peak_only_increases() {
        let m = PoolMetrics::new();
        assert_eq!(m.observe_usage(100), 100);
        assert_eq!(m.observe_usage(40), 100);
        assert_eq!(m.observe_usage(250), 250);
        assert_eq!(m.peak_memory_usage(), 250);
    }

    #[test]
    fn counters_accumulate() {
        let m = PoolMetrics::new();
        m.record_allocation();
        m.record_allocation();
        m.record_deallocation();
        m.record_failure();
        assert_eq!(m.total_allocations(), 2);
        assert_eq!(m.total_deallocations(), 1);
        assert_eq!(m.allocation_failures(), 1);
    }

    #[test]
    fn snapshot_serializes_startup_as_unix_seconds() {
        let m = PoolMetrics::with_startup_time(UNIX_EPOCH + Duration::from_secs(1_700_000_000));
        m.observe_usage(4096);
        let json = serde_json::to_value(m.snapshot()).unwrap();
        assert_eq!(json["startup_time"], 1_700_000_000.0);
        assert_eq!(json["peak_memory_usage"], 4096);
        assert_eq!(json["total_allocations"], 0);
    }

    #[test]
    fn concurrent_peak_updates_keep_maximum() {
        let m = std::sync::Arc::new(PoolMetrics::new());
        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let m = std::sync::Arc::clone(&m);
                std::thread::spawn(move || {
                    for j in 0..1000u64 {
                        m.observe_usage(i * 1000 + j);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(m.peak_memory_usage(), 7999);
    }
}
