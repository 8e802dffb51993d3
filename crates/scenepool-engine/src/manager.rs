//! Top-level handle owning an initializer and its registry.

use std::path::Path;
use std::sync::Arc;

use scenepool_config::ConfigOverrides;
use scenepool_core::{BlockTier, MemoryEngine, MetricsSnapshot, PoolHandle, PoolMetrics, SceneType};

use crate::config::{InitOptions, RegistryConfig};
use crate::error::PoolError;
use crate::initializer::PoolInitializer;
use crate::probe::{run_allocation_probe, ProbeReport};
use crate::registry::{PoolRegistry, ShutdownReport};

/// Scene-aware pool manager.
///
/// One manager per engine is the intended use; it is an explicit value
/// rather than a process-wide singleton, so independent managers (and
/// tests) never share state.
///
/// # Examples
///
/// ```ignore
/// let manager = PoolManager::new(Arc::new(engine))?;
/// let pool = manager.initialize(&SceneType::Vehicle, None)?;
/// // ... use the pool ...
/// manager.shutdown();
/// ```
pub struct PoolManager {
    initializer: PoolInitializer,
    registry: Arc<PoolRegistry>,
}

impl PoolManager {
    /// Manager with default options.
    pub fn new(engine: Arc<dyn MemoryEngine>) -> Result<Self, PoolError> {
        Self::with_options(engine, InitOptions::default(), RegistryConfig::default())
    }

    /// Manager with explicit options.
    pub fn with_options(
        engine: Arc<dyn MemoryEngine>,
        options: InitOptions,
        registry_config: RegistryConfig,
    ) -> Result<Self, PoolError> {
        let registry = Arc::new(PoolRegistry::new(registry_config));
        let initializer = PoolInitializer::new(engine, Arc::clone(&registry), options)?;
        Ok(Self {
            initializer,
            registry,
        })
    }

    /// See [`PoolInitializer::initialize`].
    pub fn initialize(
        &self,
        scene: &SceneType,
        config_path: Option<&Path>,
    ) -> Result<PoolHandle, PoolError> {
        self.initializer.initialize(scene, config_path)
    }

    /// See [`PoolInitializer::initialize_with_overrides`].
    pub fn initialize_with_overrides(
        &self,
        scene: &SceneType,
        overrides: &ConfigOverrides,
    ) -> Result<PoolHandle, PoolError> {
        self.initializer.initialize_with_overrides(scene, overrides)
    }

    /// Pool registered for `scene`.
    pub fn pool(&self, scene: &SceneType) -> Option<PoolHandle> {
        self.registry.get(scene)
    }

    /// Live metrics of the pool registered for `scene`.
    pub fn metrics(&self, scene: &SceneType) -> Option<Arc<PoolMetrics>> {
        self.registry.metrics(scene)
    }

    /// Point-in-time metrics of the pool registered for `scene`.
    pub fn snapshot(&self, scene: &SceneType) -> Option<MetricsSnapshot> {
        self.registry.metrics(scene).map(|m| m.snapshot())
    }

    /// Run an allocation probe against a registered pool. `None` if the
    /// scene is not registered.
    pub fn probe(&self, scene: &SceneType, tier: BlockTier, iterations: u64) -> Option<ProbeReport> {
        let pool = self.registry.get(scene);
        let metrics = self.registry.metrics(scene);
        match (pool, metrics) {
            (Some(pool), Some(metrics)) => {
                Some(run_allocation_probe(&*pool, &metrics, tier, iterations))
            }
            _ => {
                tracing::error!(%scene, "no pool registered for probe");
                None
            }
        }
    }

    /// The underlying registry.
    pub fn registry(&self) -> &Arc<PoolRegistry> {
        &self.registry
    }

    /// Stop every monitor. Registered pools stay available.
    pub fn shutdown(&self) -> ShutdownReport {
        self.registry.stop_all()
    }
}
