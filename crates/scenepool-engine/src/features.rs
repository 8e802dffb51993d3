//! Best-effort activation of optional pool features.

use scenepool_core::{EngineError, Feature, MemoryPool};

/// Features enabled on every pool unless [`InitOptions`](crate::InitOptions)
/// says otherwise.
pub const DEFAULT_FEATURES: [Feature; 3] = [
    Feature::MemoryReuse,
    Feature::FragmentationCleanup { threshold: 0.1 },
    Feature::AutoExpansion { utilization: 0.8 },
];

/// What happened to each requested feature.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureReport {
    /// Features the engine accepted.
    pub enabled: Vec<Feature>,
    /// Features whose capability the pool does not advertise.
    pub unsupported: Vec<Feature>,
    /// Features the engine advertised but failed to enable.
    pub failed: Vec<(Feature, EngineError)>,
}

/// Try to enable each feature in order. Neither an unsupported nor a
/// failed feature stops the others or fails initialization.
pub fn enable_features(pool: &dyn MemoryPool, features: &[Feature]) -> FeatureReport {
    let mut report = FeatureReport::default();
    for &feature in features {
        if !pool.supports(feature.capability()) {
            tracing::warn!(%feature, "pool does not support feature, skipping");
            report.unsupported.push(feature);
            continue;
        }
        match pool.enable_feature(feature) {
            Ok(()) => {
                tracing::debug!(%feature, "feature enabled");
                report.enabled.push(feature);
            }
            Err(e) => {
                tracing::warn!(%feature, error = %e, "failed to enable feature");
                report.failed.push((feature, e));
            }
        }
    }
    report
}
