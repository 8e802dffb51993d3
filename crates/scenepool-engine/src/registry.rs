//! Scene-keyed registry of live pools, their metrics, and monitors.
//!
//! All state sits behind one `Mutex`. The stop flag is an `Arc<AtomicBool>`
//! shared with every monitor, so monitors observe a stop without taking
//! the lock.

use std::mem;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use indexmap::IndexMap;
use scenepool_core::{PoolHandle, PoolMetrics, SceneType};

use crate::config::{MonitorConfig, RegistryConfig};
use crate::error::PoolError;
use crate::monitor::{spawn_monitor, MonitorHandle};

/// Result of [`PoolRegistry::stop_all`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Wall-clock time spent stopping, in milliseconds.
    pub total_ms: u64,
    /// Monitors that exited within the stop timeout.
    pub monitors_joined: usize,
    /// Monitors still running at the deadline, now detached.
    pub monitors_abandoned: usize,
}

struct RegistryState {
    pools: IndexMap<SceneType, PoolHandle>,
    metrics: IndexMap<SceneType, Arc<PoolMetrics>>,
    monitors: Vec<MonitorHandle>,
    stop_flag: Arc<AtomicBool>,
}

impl RegistryState {
    fn insert(&mut self, scene: SceneType, pool: PoolHandle, metrics: Arc<PoolMetrics>) {
        if self.pools.insert(scene.clone(), pool).is_some() {
            tracing::warn!(%scene, "replacing registered pool");
            self.retire_monitors(&scene);
        }
        self.metrics.insert(scene, metrics);
    }

    // Retired monitors stay in the set so stop_all still joins them.
    fn retire_monitors(&self, scene: &SceneType) {
        for monitor in self.monitors.iter().filter(|m| m.scene() == scene) {
            monitor.retire();
        }
    }
}

/// Registry of initialized pools.
///
/// Shared by reference (usually `Arc<PoolRegistry>`) between the
/// initializer and the caller. Registering a scene again replaces its
/// pool and metrics and retires its previous monitor.
pub struct PoolRegistry {
    config: RegistryConfig,
    state: Mutex<RegistryState>,
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

impl PoolRegistry {
    /// Create an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RegistryState {
                pools: IndexMap::new(),
                metrics: IndexMap::new(),
                monitors: Vec::new(),
                stop_flag: Arc::new(AtomicBool::new(false)),
            }),
        }
    }

    // Every mutation is a single insert or remove, so a poisoned lock
    // still guards consistent maps.
    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register `pool` under `scene` with fresh metrics stamped now.
    pub fn register(&self, scene: SceneType, pool: PoolHandle) -> Arc<PoolMetrics> {
        let metrics = Arc::new(PoolMetrics::new());
        self.lock().insert(scene, pool, Arc::clone(&metrics));
        metrics
    }

    /// Register `pool` and start its monitor under one lock acquisition.
    ///
    /// If the monitor thread cannot be started nothing is registered.
    pub fn register_monitored(
        &self,
        scene: SceneType,
        pool: PoolHandle,
        monitor: MonitorConfig,
    ) -> Result<Arc<PoolMetrics>, PoolError> {
        let metrics = Arc::new(PoolMetrics::new());
        let mut state = self.lock();
        let handle = spawn_monitor(
            scene.clone(),
            Arc::clone(&pool),
            Arc::clone(&metrics),
            Arc::clone(&state.stop_flag),
            monitor,
        )?;
        state.insert(scene, pool, Arc::clone(&metrics));
        state.monitors.push(handle);
        Ok(metrics)
    }

    /// Track an externally spawned monitor so [`stop_all`](Self::stop_all)
    /// stops it.
    pub fn attach_monitor(&self, handle: MonitorHandle) {
        self.lock().monitors.push(handle);
    }

    /// Remove a scene's pool and metrics and retire its monitor.
    pub fn deregister(&self, scene: &SceneType) -> Option<PoolHandle> {
        let mut state = self.lock();
        let pool = state.pools.shift_remove(scene)?;
        state.metrics.shift_remove(scene);
        state.retire_monitors(scene);
        tracing::info!(%scene, "pool deregistered");
        Some(pool)
    }

    /// The pool registered for `scene`.
    pub fn get(&self, scene: &SceneType) -> Option<PoolHandle> {
        self.lock().pools.get(scene).cloned()
    }

    /// Metrics of the pool registered for `scene`.
    pub fn metrics(&self, scene: &SceneType) -> Option<Arc<PoolMetrics>> {
        self.lock().metrics.get(scene).cloned()
    }

    /// Registered scenes in registration order.
    pub fn scenes(&self) -> Vec<SceneType> {
        self.lock().pools.keys().cloned().collect()
    }

    /// Number of registered pools.
    pub fn len(&self) -> usize {
        self.lock().pools.len()
    }

    /// Whether no pool is registered.
    pub fn is_empty(&self) -> bool {
        self.lock().pools.is_empty()
    }

    /// Number of tracked monitors, including retired ones not yet joined.
    pub fn monitor_count(&self) -> usize {
        self.lock().monitors.len()
    }

    /// The stop flag that newly spawned monitors should observe.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.lock().stop_flag)
    }

    /// Stop every monitor.
    ///
    /// Sets the stop flag, wakes each monitor, and waits up to
    /// `stop_timeout` for each one. Monitors still running at their
    /// deadline are abandoned. The monitor set is empty afterwards and a
    /// fresh stop flag is installed, so later registrations get live
    /// monitors. Registered pools are kept.
    pub fn stop_all(&self) -> ShutdownReport {
        let start = Instant::now();
        let monitors = {
            let mut state = self.lock();
            state.stop_flag.store(true, Ordering::Release);
            state.stop_flag = Arc::new(AtomicBool::new(false));
            mem::take(&mut state.monitors)
        };

        tracing::info!(count = monitors.len(), "stopping pool monitors");
        for monitor in &monitors {
            monitor.wake();
        }

        let mut report = ShutdownReport::default();
        for monitor in monitors {
            let scene = monitor.scene().clone();
            if monitor.wait(self.config.stop_timeout) {
                report.monitors_joined += 1;
            } else {
                tracing::warn!(
                    %scene,
                    timeout = ?self.config.stop_timeout,
                    "monitor did not stop in time, abandoning"
                );
                report.monitors_abandoned += 1;
            }
        }
        report.total_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            joined = report.monitors_joined,
            abandoned = report.monitors_abandoned,
            total_ms = report.total_ms,
            "pool monitors stopped"
        );
        report
    }
}

impl Drop for PoolRegistry {
    fn drop(&mut self) {
        if self.monitor_count() > 0 {
            self.stop_all();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use scenepool_core::MemoryEngine;
    use scenepool_test_utils::MockEngine;

    fn pool(engine: &MockEngine) -> PoolHandle {
        engine.create_pool(1024).unwrap()
    }

    #[test]
    fn register_and_lookup() {
        let engine = MockEngine::new();
        let registry = PoolRegistry::default();
        let metrics = registry.register(SceneType::Vehicle, pool(&engine));

        assert_eq!(registry.len(), 1);
        assert!(registry.get(&SceneType::Vehicle).is_some());
        assert!(registry.get(&SceneType::VirtualIp).is_none());
        let looked_up = registry.metrics(&SceneType::Vehicle).unwrap();
        assert!(Arc::ptr_eq(&metrics, &looked_up));
        assert_eq!(metrics.total_allocations(), 0);
        assert_eq!(metrics.peak_memory_usage(), 0);
    }

    #[test]
    fn reregister_replaces_pool_and_metrics() {
        let engine = MockEngine::new();
        let registry = PoolRegistry::default();
        let first = registry.register(SceneType::Vehicle, pool(&engine));
        first.record_allocation();
        let second = registry.register(SceneType::Vehicle, pool(&engine));

        assert_eq!(registry.len(), 1);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(registry.metrics(&SceneType::Vehicle).unwrap().total_allocations(), 0);
    }

    #[test]
    fn reregister_retires_previous_monitor() {
        let engine = MockEngine::new();
        let registry = PoolRegistry::default();
        registry
            .register_monitored(SceneType::Vehicle, pool(&engine), MonitorConfig::default())
            .unwrap();
        registry
            .register_monitored(SceneType::Vehicle, pool(&engine), MonitorConfig::default())
            .unwrap();
        assert_eq!(registry.monitor_count(), 2);

        let report = registry.stop_all();
        assert_eq!(report.monitors_joined, 2);
        assert_eq!(report.monitors_abandoned, 0);
    }

    #[test]
    fn stop_all_is_prompt_and_clears_monitors() {
        let engine = MockEngine::new();
        let registry = PoolRegistry::default();
        for scene in SceneType::KNOWN {
            registry
                .register_monitored(scene, pool(&engine), MonitorConfig::default())
                .unwrap();
        }
        assert_eq!(registry.monitor_count(), 3);

        let start = Instant::now();
        let report = registry.stop_all();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(report.monitors_joined, 3);
        assert_eq!(registry.monitor_count(), 0);
        assert_eq!(registry.len(), 3, "pools survive a monitor shutdown");
    }

    #[test]
    fn attached_monitor_is_stopped_by_stop_all() {
        let engine = MockEngine::new();
        let registry = PoolRegistry::default();
        let metrics = registry.register(SceneType::Vehicle, pool(&engine));
        let handle = spawn_monitor(
            SceneType::Vehicle,
            registry.get(&SceneType::Vehicle).unwrap(),
            metrics,
            registry.stop_flag(),
            MonitorConfig::default(),
        )
        .unwrap();
        registry.attach_monitor(handle);
        assert_eq!(registry.monitor_count(), 1);

        let report = registry.stop_all();
        assert_eq!(report.monitors_joined, 1);
        assert_eq!(report.monitors_abandoned, 0);
        assert_eq!(registry.monitor_count(), 0);
    }

    #[test]
    fn stop_all_on_empty_registry() {
        let registry = PoolRegistry::default();
        assert_eq!(registry.stop_all().monitors_joined, 0);
        assert_eq!(registry.stop_all().monitors_abandoned, 0);
    }

    #[test]
    fn fresh_stop_flag_after_stop_all() {
        let registry = PoolRegistry::default();
        let before = registry.stop_flag();
        registry.stop_all();
        assert!(before.load(Ordering::Acquire));
        assert!(!registry.stop_flag().load(Ordering::Acquire));
    }

    #[test]
    fn deregister_removes_pool_and_metrics() {
        let engine = MockEngine::new();
        let registry = PoolRegistry::default();
        registry
            .register_monitored(SceneType::VirtualIp, pool(&engine), MonitorConfig::default())
            .unwrap();
        assert!(registry.deregister(&SceneType::VirtualIp).is_some());
        assert!(registry.get(&SceneType::VirtualIp).is_none());
        assert!(registry.metrics(&SceneType::VirtualIp).is_none());
        assert!(registry.deregister(&SceneType::VirtualIp).is_none());
        assert_eq!(registry.stop_all().monitors_joined, 1);
    }

    #[test]
    fn concurrent_registration_of_distinct_scenes() {
        let engine = Arc::new(MockEngine::new());
        let registry = Arc::new(PoolRegistry::default());
        let threads: Vec<_> = (0..8)
            .map(|i| {
                let engine = Arc::clone(&engine);
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || {
                    registry.register(SceneType::Other(format!("scene{i}")), pool(&engine));
                })
            })
            .collect();
        for t in threads {
            t.join().unwrap();
        }
        assert_eq!(registry.len(), 8);
    }
}
