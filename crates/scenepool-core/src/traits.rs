//! Interface to the external memory engine.
//!
//! scenepool never allocates memory itself. Everything it knows about a
//! pool comes through these two traits, and optional engine features are
//! discovered through [`MemoryPool::supports`] rather than assumed.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::block::{Block, BlockClassSpec, BlockTier};
use crate::error::EngineError;

/// Shared handle to an engine-owned pool.
pub type PoolHandle = Arc<dyn MemoryPool>;

/// Factory for engine pools.
///
/// `create_pool` may block for an arbitrary time; callers that need a
/// bound run it on a worker thread, so implementations must be
/// `Send + Sync + 'static`.
pub trait MemoryEngine: Send + Sync + 'static {
    /// Create a pool with the given total memory ceiling in bytes.
    fn create_pool(&self, total_memory: u64) -> Result<PoolHandle, EngineError>;
}

/// Optional capabilities an engine pool may advertise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Reuse of freed blocks without returning them to the system.
    MemoryReuse,
    /// Background fragmentation cleanup.
    FragmentationCleanup,
    /// Automatic pool expansion under pressure.
    AutoExpansion,
    /// [`MemoryPool::usage_stats`] is implemented.
    UsageStats,
}

impl Capability {
    /// Stable name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::MemoryReuse => "memory_reuse",
            Self::FragmentationCleanup => "fragmentation_cleanup",
            Self::AutoExpansion => "auto_expansion",
            Self::UsageStats => "usage_stats",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An optional feature together with its activation arguments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Feature {
    /// Enable block reuse.
    MemoryReuse,
    /// Enable fragmentation cleanup once the fragmented fraction exceeds
    /// `threshold` (0.0–1.0).
    FragmentationCleanup {
        /// Fragmented fraction that triggers cleanup.
        threshold: f64,
    },
    /// Expand the pool once utilization exceeds `utilization` (0.0–1.0).
    AutoExpansion {
        /// Utilization fraction that triggers expansion.
        utilization: f64,
    },
}

impl Feature {
    /// Capability the engine must advertise for this feature.
    pub fn capability(&self) -> Capability {
        match self {
            Self::MemoryReuse => Capability::MemoryReuse,
            Self::FragmentationCleanup { .. } => Capability::FragmentationCleanup,
            Self::AutoExpansion { .. } => Capability::AutoExpansion,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MemoryReuse => write!(f, "memory_reuse"),
            Self::FragmentationCleanup { threshold } => {
                write!(f, "fragmentation_cleanup(threshold={threshold})")
            }
            Self::AutoExpansion { utilization } => {
                write!(f, "auto_expansion(utilization={utilization})")
            }
        }
    }
}

/// Point-in-time usage reported by a pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UsageStats {
    /// Bytes currently handed out.
    pub used_memory: u64,
    /// Blocks currently handed out.
    pub allocated_blocks: u64,
}

/// An engine-owned pool instance.
///
/// All methods take `&self`: the same pool is shared between the caller,
/// the registry and its monitor, so implementations synchronise
/// internally.
pub trait MemoryPool: Send + Sync {
    /// Total memory ceiling the pool was created with, in bytes.
    fn total_memory(&self) -> u64;

    /// Add a block class to the pool.
    fn add_block_class(&self, spec: &BlockClassSpec) -> Result<(), EngineError>;

    /// Take one block from the given tier, or `None` if the tier is
    /// exhausted or unconfigured.
    fn allocate(&self, tier: BlockTier) -> Option<Block>;

    /// Return a block previously handed out by [`allocate`](Self::allocate).
    fn deallocate(&self, block: Block);

    /// Whether the pool implements an optional capability. Absence is a
    /// normal outcome.
    fn supports(&self, capability: Capability) -> bool;

    /// Turn on an optional feature. Only called when
    /// [`supports`](Self::supports) returned `true` for its capability.
    fn enable_feature(&self, feature: Feature) -> Result<(), EngineError>;

    /// Raw block layout report.
    ///
    /// Engines differ in shape: an object keyed by tier name or an array
    /// of entries, each carrying a size and a count. See
    /// [`BlockLayout::decode`](crate::layout::BlockLayout::decode).
    fn block_config(&self) -> Result<Value, EngineError>;

    /// Current usage. Only called when
    /// [`supports(Capability::UsageStats)`](Self::supports) is `true`.
    fn usage_stats(&self) -> Result<UsageStats, EngineError>;
}
