//! Scenepool: scene-aware tiered memory pool lifecycle manager.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the scenepool sub-crates. Scenepool does not allocate memory itself; it
//! drives an external engine (anything implementing
//! [`types::MemoryEngine`]) through construction, tiered configuration,
//! feature activation and validation, then keeps the resulting pools in a
//! registry with a background usage monitor per pool.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scenepool::prelude::*;
//!
//! let manager = PoolManager::new(Arc::new(my_engine))?;
//! let pool = manager.initialize(&SceneType::Vehicle, None)?;
//! let block = pool.allocate(BlockTier::Small);
//! // ...
//! manager.shutdown();
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `scenepool-core` | Scenes, tiers, profiles, layout decoding, metrics, engine traits |
//! | [`config`] | `scenepool-config` | Override documents: loading, coercion, sample |
//! | [`engine`] | `scenepool-engine` | Initializer, validator, registry, monitors, manager |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the engine interface (`scenepool-core`).
///
/// Implement [`types::MemoryEngine`] and [`types::MemoryPool`] to plug in
/// an engine.
pub use scenepool_core as types;

/// Override documents (`scenepool-config`).
pub use scenepool_config as config;

/// Pool lifecycle (`scenepool-engine`).
///
/// [`engine::PoolManager`] for most uses; [`engine::PoolInitializer`] and
/// [`engine::PoolRegistry`] when the registry is shared explicitly.
pub use scenepool_engine as engine;

/// Common imports for typical scenepool usage.
///
/// ```rust
/// use scenepool::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use scenepool_core::{
        Block, BlockClassSpec, BlockTier, Capability, Feature, MemoryEngine, MemoryPool,
        MetricsSnapshot, PoolHandle, PoolMetrics, SceneType, UsageStats,
    };

    // Errors
    pub use scenepool_config::ConfigError;
    pub use scenepool_core::EngineError;
    pub use scenepool_engine::PoolError;

    // Config
    pub use scenepool_config::ConfigOverrides;

    // Engine
    pub use scenepool_engine::{
        InitOptions, MonitorConfig, PoolManager, PoolRegistry, RegistryConfig, ShutdownReport,
    };
}
