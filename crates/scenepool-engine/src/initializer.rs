//! Building a ready-to-use pool for a scenario.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use scenepool_config::ConfigOverrides;
use scenepool_core::{configured_total, BlockClassSpec, MemoryEngine, MemoryPool, PoolHandle, SceneType};

use crate::config::InitOptions;
use crate::construct::create_pool_with_timeout;
use crate::error::PoolError;
use crate::features::enable_features;
use crate::registry::PoolRegistry;
use crate::tiers::resolve_plan;
use crate::validator::{mib, validate};

/// Runs the initialization pipeline and registers the result.
///
/// Steps, in order: load overrides, resolve the plan, construct under the
/// timeout, add block classes, enable features, validate, then register
/// and start a monitor. Any failure before registration leaves the
/// registry untouched.
pub struct PoolInitializer {
    engine: Arc<dyn MemoryEngine>,
    registry: Arc<PoolRegistry>,
    options: InitOptions,
}

impl PoolInitializer {
    /// Create an initializer that registers into `registry`.
    pub fn new(
        engine: Arc<dyn MemoryEngine>,
        registry: Arc<PoolRegistry>,
        options: InitOptions,
    ) -> Result<Self, PoolError> {
        options.validate()?;
        Ok(Self {
            engine,
            registry,
            options,
        })
    }

    /// Options in effect.
    pub fn options(&self) -> &InitOptions {
        &self.options
    }

    /// Initialize a pool for `scene`, reading overrides from `config_path`
    /// when given.
    pub fn initialize(
        &self,
        scene: &SceneType,
        config_path: Option<&Path>,
    ) -> Result<PoolHandle, PoolError> {
        let overrides = match config_path {
            Some(path) => scenepool_config::load(path).inspect_err(|e| {
                tracing::error!(%scene, error = %e, "pool initialization failed");
            })?,
            None => ConfigOverrides::new(),
        };
        self.initialize_with_overrides(scene, &overrides)
    }

    /// Initialize a pool for `scene` with already-loaded overrides.
    pub fn initialize_with_overrides(
        &self,
        scene: &SceneType,
        overrides: &ConfigOverrides,
    ) -> Result<PoolHandle, PoolError> {
        let start = Instant::now();
        let result = self.build(scene, overrides);
        match &result {
            Ok(_) => tracing::info!(
                %scene,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "scene memory pool ready"
            ),
            Err(e) => tracing::error!(%scene, error = %e, "pool initialization failed"),
        }
        result
    }

    fn build(&self, scene: &SceneType, overrides: &ConfigOverrides) -> Result<PoolHandle, PoolError> {
        let plan = resolve_plan(scene, overrides, self.options.generic_fallback)?;
        tracing::info!(
            %scene,
            budget_mib = mib(plan.budget),
            configured_mib = mib(configured_total(&plan.classes)),
            "initializing scene memory pool"
        );

        let pool = create_pool_with_timeout(&self.engine, plan.budget, self.options.construction_timeout)?;
        add_block_classes(&*pool, &plan.classes)?;
        enable_features(&*pool, &self.options.features);

        let check = validate(&*pool, plan.budget).map_err(|e| PoolError::Validation {
            reason: e.to_string(),
        })?;
        if !check.is_valid() {
            return Err(PoolError::Validation {
                reason: check.to_string(),
            });
        }

        self.registry
            .register_monitored(scene.clone(), Arc::clone(&pool), self.options.monitor.clone())?;
        Ok(pool)
    }
}

fn add_block_classes(pool: &dyn MemoryPool, classes: &[BlockClassSpec]) -> Result<(), PoolError> {
    for spec in classes {
        pool.add_block_class(spec)?;
        tracing::debug!(
            tier = %spec.tier,
            size = spec.size,
            count = spec.count,
            purpose = spec.purpose,
            "block class added"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use scenepool_core::{BlockTier, MIB};
    use scenepool_test_utils::{LayoutShape, MockEngine};

    fn initializer(engine: MockEngine, options: InitOptions) -> (Arc<MockEngine>, Arc<PoolRegistry>, PoolInitializer) {
        let engine = Arc::new(engine);
        let registry = Arc::new(PoolRegistry::default());
        let init = PoolInitializer::new(engine.clone(), Arc::clone(&registry), options).unwrap();
        (engine, registry, init)
    }

    #[test]
    fn public_service_screen_end_to_end() {
        let (engine, registry, init) = initializer(MockEngine::new(), InitOptions::default());
        let pool = init
            .initialize(&SceneType::PublicServiceScreen, None)
            .unwrap();
        assert_eq!(pool.total_memory(), 512 * MIB);

        let classes = engine.pools()[0].block_classes();
        let tiers: Vec<_> = classes.iter().map(|c| c.tier).collect();
        assert_eq!(tiers, [BlockTier::Large, BlockTier::Small, BlockTier::Medium]);
        assert!(registry.get(&SceneType::PublicServiceScreen).is_some());
        assert_eq!(registry.monitor_count(), 1);
    }

    #[test]
    fn invalid_options_rejected_at_construction() {
        let options = InitOptions {
            construction_timeout: Duration::ZERO,
            ..InitOptions::default()
        };
        let engine: Arc<dyn MemoryEngine> = Arc::new(MockEngine::new());
        match PoolInitializer::new(engine, Arc::new(PoolRegistry::default()), options) {
            Err(PoolError::InvalidOptions { .. }) => {}
            Err(other) => panic!("expected InvalidOptions, got {other:?}"),
            Ok(_) => panic!("expected InvalidOptions, got Ok"),
        }
    }

    #[test]
    fn add_block_class_failure_is_construction_error() {
        let (_, registry, init) =
            initializer(MockEngine::new().with_add_block_failure("tier table full"), InitOptions::default());
        match init.initialize(&SceneType::Vehicle, None) {
            Err(PoolError::EngineConstruction(e)) => assert_eq!(e.operation, "add_block_class"),
            other => panic!("expected EngineConstruction, got {:?}", other.map(|_| ())),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn block_config_failure_is_validation_error() {
        let (_, registry, init) =
            initializer(MockEngine::new().with_block_config_failure("report unavailable"), InitOptions::default());
        match init.initialize(&SceneType::Vehicle, None) {
            Err(PoolError::Validation { reason }) => assert!(reason.contains("report unavailable")),
            other => panic!("expected Validation, got {:?}", other.map(|_| ())),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn unrecognized_layout_is_validation_error() {
        let (_, registry, init) =
            initializer(MockEngine::new().with_layout_shape(LayoutShape::Scalar), InitOptions::default());
        match init.initialize(&SceneType::VirtualIp, None) {
            Err(PoolError::Validation { reason }) => assert!(reason.contains("unrecognized")),
            other => panic!("expected Validation, got {:?}", other.map(|_| ())),
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn missing_config_file_fails_before_construction() {
        let (engine, registry, init) = initializer(MockEngine::new(), InitOptions::default());
        let dir = tempfile::tempdir().unwrap();
        match init.initialize(&SceneType::Vehicle, Some(&dir.path().join("absent.json"))) {
            Err(PoolError::Config(_)) => {}
            other => panic!("expected Config, got {:?}", other.map(|_| ())),
        }
        assert_eq!(engine.created(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn feature_failures_are_not_fatal() {
        let engine = MockEngine::new()
            .with_capabilities(&[scenepool_core::Capability::UsageStats])
            .with_feature_failure(scenepool_core::Capability::MemoryReuse);
        let (engine, registry, init) = initializer(engine, InitOptions::default());
        init.initialize(&SceneType::Vehicle, None).unwrap();
        assert!(engine.pools()[0].enabled_features().is_empty());
        assert_eq!(registry.len(), 1);
    }
}
