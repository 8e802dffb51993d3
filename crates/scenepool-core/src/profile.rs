//! Static per-scene budgets and block-class layouts.
//!
//! Pure lookup tables, no I/O. Classes are listed in the order they are
//! added to a pool; that order is part of the profile because engines may
//! lay tiers out in insertion order.
//!
//! | Scene | Budget | Classes |
//! |-------|--------|---------|
//! | `PublicServiceScreen` | 512 MiB | large 64 MiB×4, small 32 KiB×1024, medium 2 MiB×32 |
//! | `Vehicle` | 1 GiB | medium 16 MiB×28, small 64 KiB×512, large 128 MiB×4 |
//! | `VirtualIp` | 2 GiB | large 256 MiB×6, medium 8 MiB×32, small 128 KiB×256 |
//! | generic | 512 MiB | medium 32 MiB×8 |

use smallvec::smallvec;

use crate::block::{BlockClassSpec, BlockClasses, BlockTier, KIB, MIB};
use crate::error::ProfileError;
use crate::scene::SceneType;

/// Default budget of the generic single-tier profile.
pub const GENERIC_BUDGET: u64 = 512 * MIB;

/// A resolved budget plus the block classes to add under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenePlan {
    /// Total memory ceiling in bytes.
    pub budget: u64,
    /// Block classes in insertion order.
    pub classes: BlockClasses,
}

/// Default total memory budget for a built-in scenario.
pub fn default_budget(scene: &SceneType) -> Result<u64, ProfileError> {
    match scene {
        SceneType::PublicServiceScreen => Ok(512 * MIB),
        SceneType::Vehicle => Ok(1024 * MIB),
        SceneType::VirtualIp => Ok(2048 * MIB),
        SceneType::Other(_) => Err(ProfileError::UnsupportedScene {
            scene: scene.clone(),
        }),
    }
}

/// Default block classes for a built-in scenario.
pub fn default_block_classes(scene: &SceneType) -> Result<BlockClasses, ProfileError> {
    let classes = match scene {
        SceneType::PublicServiceScreen => smallvec![
            class(BlockTier::Large, 64 * MIB, 4, "static 3D avatar models and HD textures"),
            class(BlockTier::Small, 32 * KIB, 1024, "interaction commands, queries and device state"),
            class(BlockTier::Medium, 2 * MIB, 32, "dynamic content and scratch computation"),
        ],
        SceneType::Vehicle => smallvec![
            class(BlockTier::Medium, 16 * MIB, 28, "generated motion frames and render cache"),
            class(BlockTier::Small, 64 * KIB, 512, "sensor samples and control commands"),
            class(BlockTier::Large, 128 * MIB, 4, "HD map tiles and inference models"),
        ],
        SceneType::VirtualIp => smallvec![
            class(BlockTier::Large, 256 * MIB, 6, "4K textures, HD models and motion data"),
            class(BlockTier::Medium, 8 * MIB, 32, "animation frames and physics intermediates"),
            class(BlockTier::Small, 128 * KIB, 256, "user interaction and network packets"),
        ],
        SceneType::Other(_) => {
            return Err(ProfileError::UnsupportedScene {
                scene: scene.clone(),
            })
        }
    };
    Ok(classes)
}

/// Built-in plan for a scenario: default budget plus default classes.
pub fn scene_plan(scene: &SceneType) -> Result<ScenePlan, ProfileError> {
    Ok(ScenePlan {
        budget: default_budget(scene)?,
        classes: default_block_classes(scene)?,
    })
}

/// The single-tier fallback profile for scenarios without a built-in one.
pub fn generic_profile() -> ScenePlan {
    ScenePlan {
        budget: GENERIC_BUDGET,
        classes: smallvec![class(
            BlockTier::Medium,
            32 * MIB,
            8,
            "generic medium-object pool"
        )],
    }
}

fn class(tier: BlockTier, size: u64, count: u64, purpose: &'static str) -> BlockClassSpec {
    BlockClassSpec {
        tier,
        size,
        count,
        purpose,
    }
}
