//! Core types, scene profiles, and engine traits for scenepool.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! scenario identity, block-class descriptors, the static per-scene
//! profiles, the engine collaborator traits, the decoded block-layout
//! report, and per-pool metrics.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod block;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod profile;
pub mod scene;
pub mod traits;

pub use block::{configured_total, Block, BlockClassSpec, BlockClasses, BlockTier, KIB, MIB};
pub use error::{EngineError, ProfileError};
pub use layout::{BlockLayout, ReportedBlock};
pub use metrics::{MetricsSnapshot, PoolMetrics};
pub use profile::{
    default_block_classes, default_budget, generic_profile, scene_plan, ScenePlan, GENERIC_BUDGET,
};
pub use scene::SceneType;
pub use traits::{Capability, Feature, MemoryEngine, MemoryPool, PoolHandle, UsageStats};
