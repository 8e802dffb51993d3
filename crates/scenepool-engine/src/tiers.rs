//! Resolving a scenario's budget and block classes from its profile and
//! the override document.

use scenepool_config::{block_count_key, block_size_key, ConfigOverrides};
use scenepool_core::{generic_profile, scene_plan, BlockClassSpec, SceneType, ScenePlan};

use crate::error::PoolError;

/// Resolve the plan a pool for `scene` will be built from.
///
/// The budget is `<SCENE>_TOTAL_MEMORY` if present, else the profile
/// default. Each block class takes `<PREFIX>_<TIER>_BLOCK_SIZE` and
/// `<PREFIX>_<TIER>_BLOCK_COUNT` from the overrides when present. A size
/// override of zero is ignored with a warning; a count of zero is kept.
///
/// Scenarios without a built-in profile fail with
/// [`PoolError::UnsupportedScene`] unless `generic_fallback` is set.
pub fn resolve_plan(
    scene: &SceneType,
    overrides: &ConfigOverrides,
    generic_fallback: bool,
) -> Result<ScenePlan, PoolError> {
    let base = match scene_plan(scene) {
        Ok(plan) => plan,
        Err(_) if generic_fallback => {
            tracing::warn!(%scene, "no built-in profile, using the generic profile");
            generic_profile()
        }
        Err(e) => return Err(e.into()),
    };

    let budget = overrides
        .quantity(&scene.total_memory_key())
        .unwrap_or(base.budget);

    let classes = base
        .classes
        .iter()
        .map(|spec| apply_overrides(scene, spec, overrides))
        .collect();

    Ok(ScenePlan { budget, classes })
}

fn apply_overrides(
    scene: &SceneType,
    spec: &BlockClassSpec,
    overrides: &ConfigOverrides,
) -> BlockClassSpec {
    let size_key = block_size_key(scene, spec.tier);
    let size = match overrides.quantity(&size_key) {
        Some(0) => {
            tracing::warn!(key = %size_key, "block size override of 0 ignored");
            spec.size
        }
        Some(size) => size,
        None => spec.size,
    };
    let count = overrides
        .quantity(&block_count_key(scene, spec.tier))
        .unwrap_or(spec.count);
    BlockClassSpec {
        size,
        count,
        ..*spec
    }
}
