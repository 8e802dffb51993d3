//! Allocation throughput probe.
//!
//! Allocates and immediately frees one block `iterations` times, recording
//! each outcome in the pool's metrics. Useful as a smoke test right after
//! initialization.

use std::time::{Duration, Instant};

use scenepool_core::{BlockTier, MemoryPool, PoolMetrics};

/// Failures are logged once per this many.
const FAILURE_LOG_EVERY: u64 = 100;

/// Outcome of [`run_allocation_probe`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeReport {
    /// Tier that was probed.
    pub tier: BlockTier,
    /// Attempts made.
    pub iterations: u64,
    /// Attempts that got a block.
    pub succeeded: u64,
    /// Attempts that did not.
    pub failed: u64,
    /// Wall-clock time for the whole run.
    pub elapsed: Duration,
}

impl ProbeReport {
    /// Mean time per attempt, or zero for an empty run.
    pub fn avg_per_op(&self) -> Duration {
        match u32::try_from(self.iterations) {
            Ok(0) => Duration::ZERO,
            Ok(n) => self.elapsed / n,
            Err(_) => Duration::from_secs_f64(self.elapsed.as_secs_f64() / self.iterations as f64),
        }
    }
}

/// Run the probe against `tier` of `pool`.
pub fn run_allocation_probe(
    pool: &dyn MemoryPool,
    metrics: &PoolMetrics,
    tier: BlockTier,
    iterations: u64,
) -> ProbeReport {
    let start = Instant::now();
    let mut succeeded = 0;
    let mut failed = 0;

    for _ in 0..iterations {
        match pool.allocate(tier) {
            Some(block) => {
                metrics.record_allocation();
                pool.deallocate(block);
                metrics.record_deallocation();
                succeeded += 1;
            }
            None => {
                metrics.record_failure();
                failed += 1;
                if failed % FAILURE_LOG_EVERY == 0 {
                    tracing::warn!(%tier, failed, "allocation failures during probe");
                }
            }
        }
    }

    let report = ProbeReport {
        tier,
        iterations,
        succeeded,
        failed,
        elapsed: start.elapsed(),
    };
    tracing::info!(
        %tier,
        iterations,
        failed,
        avg_us = report.avg_per_op().as_secs_f64() * 1e6,
        "allocation probe finished"
    );
    report
}
