//! Per-pool background usage monitor.
//!
//! Each registered pool gets one named thread that samples usage, folds it
//! into the pool's peak, and sleeps. Sleeps use `park_timeout`, so
//! [`MonitorHandle::wake`] makes a stop visible immediately instead of
//! after the current interval.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use scenepool_core::{Capability, EngineError, MemoryPool, PoolHandle, PoolMetrics, SceneType};

use crate::config::MonitorConfig;
use crate::error::PoolError;
use crate::validator::mib;

/// A running monitor thread.
///
/// The thread exits once either the registry-wide stop flag or this
/// monitor's own retirement flag is set.
#[derive(Debug)]
pub struct MonitorHandle {
    scene: SceneType,
    thread: JoinHandle<()>,
    // Never sent on; disconnects when the thread exits.
    done_rx: Receiver<()>,
    retired: Arc<AtomicBool>,
}

impl MonitorHandle {
    /// Scenario this monitor samples.
    pub fn scene(&self) -> &SceneType {
        &self.scene
    }

    /// Stop only this monitor, leaving the registry-wide flag untouched.
    pub fn retire(&self) {
        self.retired.store(true, Ordering::Release);
        self.wake();
    }

    /// Interrupt the current sleep so the stop flags are re-checked.
    pub fn wake(&self) {
        self.thread.thread().unpark();
    }

    /// Whether the thread has exited.
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait up to `timeout` for the thread to exit and join it.
    ///
    /// Returns `true` if the thread exited in time. A thread still running
    /// at the deadline is detached and `false` is returned.
    pub fn wait(self, timeout: Duration) -> bool {
        match self.done_rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Timeout) => false,
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if self.thread.join().is_err() {
                    tracing::error!(scene = %self.scene, "monitor thread panicked");
                }
                true
            }
        }
    }
}

/// Start a monitor for `pool`.
pub fn spawn_monitor(
    scene: SceneType,
    pool: PoolHandle,
    metrics: Arc<PoolMetrics>,
    stop: Arc<AtomicBool>,
    config: MonitorConfig,
) -> Result<MonitorHandle, PoolError> {
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);
    let retired = Arc::new(AtomicBool::new(false));

    let monitor = MonitorLoop {
        scene: scene.clone(),
        pool,
        metrics,
        stop,
        retired: Arc::clone(&retired),
        config,
    };

    let thread = thread::Builder::new()
        .name(format!("scenepool-monitor-{}", scene.config_key().to_lowercase()))
        .spawn(move || {
            let _done = done_tx;
            monitor.run();
        })
        .map_err(|e| PoolError::ThreadSpawnFailed {
            reason: format!("monitor for {scene}: {e}"),
        })?;

    Ok(MonitorHandle {
        scene,
        thread,
        done_rx,
        retired,
    })
}

/// Take one usage sample and fold it into `metrics`.
///
/// Returns the peak after the sample, or `None` when the pool does not
/// report usage.
pub fn sample_once(pool: &dyn MemoryPool, metrics: &PoolMetrics) -> Result<Option<u64>, EngineError> {
    if !pool.supports(Capability::UsageStats) {
        return Ok(None);
    }
    let stats = pool.usage_stats()?;
    Ok(Some(metrics.observe_usage(stats.used_memory)))
}

struct MonitorLoop {
    scene: SceneType,
    pool: PoolHandle,
    metrics: Arc<PoolMetrics>,
    stop: Arc<AtomicBool>,
    retired: Arc<AtomicBool>,
    config: MonitorConfig,
}

impl MonitorLoop {
    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire) || self.retired.load(Ordering::Acquire)
    }

    fn run(self) {
        tracing::debug!(scene = %self.scene, "pool monitor started");
        while !self.should_stop() {
            let pause = match self.sample() {
                Ok(Some(peak)) => {
                    tracing::debug!(scene = %self.scene, peak_mib = mib(peak), "usage sampled");
                    self.config.sample_interval
                }
                Ok(None) => self.config.sample_interval,
                Err(reason) => {
                    tracing::error!(scene = %self.scene, %reason, "usage sampling failed");
                    self.config.error_backoff
                }
            };
            self.sleep(pause);
        }
        tracing::debug!(scene = %self.scene, "pool monitor stopped");
    }

    // A panicking engine call counts as a failed sample.
    fn sample(&self) -> Result<Option<u64>, String> {
        match panic::catch_unwind(AssertUnwindSafe(|| sample_once(&*self.pool, &self.metrics))) {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(payload) => Err(panic_message(payload.as_ref())),
        }
    }

    // An interval past the clock's range sleeps until woken.
    fn sleep(&self, duration: Duration) {
        let Some(deadline) = Instant::now().checked_add(duration) else {
            while !self.should_stop() {
                thread::park();
            }
            return;
        };
        while !self.should_stop() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::park_timeout(deadline - now);
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("engine panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("engine panicked: {s}")
    } else {
        "engine panicked".to_string()
    }
}
