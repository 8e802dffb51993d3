//! Pool construction, validation, registry, and monitoring for scenepool.
//!
//! [`PoolManager`] is the entry point: it resolves a scenario's layout,
//! builds the pool on the external engine under a time budget, validates
//! it, registers it in a [`PoolRegistry`], and starts a background
//! monitor. [`PoolManager::shutdown`] stops every monitor within a
//! bounded time.
//!
//! ```text
//! caller ── initialize(scene) ──> PoolInitializer
//!                                   ├─ scenepool_config::load
//!                                   ├─ tiers::resolve_plan
//!                                   ├─ construct (worker + bounded(1) channel)
//!                                   ├─ add block classes
//!                                   ├─ features (best effort)
//!                                   ├─ validator
//!                                   └─ PoolRegistry::register + spawn monitor
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod construct;
pub mod error;
pub mod features;
pub mod initializer;
pub mod manager;
pub mod monitor;
pub mod probe;
pub mod registry;
pub mod tiers;
pub mod validator;

pub use config::{InitOptions, MonitorConfig, RegistryConfig};
pub use construct::create_pool_with_timeout;
pub use error::PoolError;
pub use features::{enable_features, FeatureReport, DEFAULT_FEATURES};
pub use initializer::PoolInitializer;
pub use manager::PoolManager;
pub use monitor::{sample_once, spawn_monitor, MonitorHandle};
pub use probe::{run_allocation_probe, ProbeReport};
pub use registry::{PoolRegistry, ShutdownReport};
pub use tiers::resolve_plan;
pub use validator::{check_layout, validate, LayoutCheck};
