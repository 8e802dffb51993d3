//! Block tiers, block-class descriptors, and engine block references.

use std::fmt;

use smallvec::SmallVec;

/// One kibibyte.
pub const KIB: u64 = 1024;
/// One mebibyte.
pub const MIB: u64 = 1024 * KIB;

/// Size class of a block within a tiered pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockTier {
    /// Large objects: models, textures, maps.
    Large,
    /// Medium objects: frame caches, intermediate results.
    Medium,
    /// Small objects: commands, sensor samples, network packets.
    Small,
}

impl BlockTier {
    /// All tiers, largest first.
    pub const ALL: [BlockTier; 3] = [BlockTier::Large, BlockTier::Medium, BlockTier::Small];

    /// Upper-case fragment used in override keys.
    pub fn key_fragment(self) -> &'static str {
        match self {
            Self::Large => "LARGE",
            Self::Medium => "MEDIUM",
            Self::Small => "SMALL",
        }
    }

    /// Lower-case name used in engine layout reports.
    pub fn name(self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Medium => "medium",
            Self::Small => "small",
        }
    }
}

impl fmt::Display for BlockTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Describes one block class to be added to a pool.
///
/// Invariant: `size > 0`. A `count` of zero is allowed and contributes
/// nothing to the configured total.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockClassSpec {
    /// Tier this class belongs to.
    pub tier: BlockTier,
    /// Size of each block in bytes.
    pub size: u64,
    /// Number of blocks.
    pub count: u64,
    /// What the blocks are used for.
    pub purpose: &'static str,
}

impl BlockClassSpec {
    /// Total bytes reserved by this class, saturating on overflow.
    pub fn total_bytes(&self) -> u64 {
        self.size.saturating_mul(self.count)
    }
}

/// Ordered block classes of one scenario. Never more than three.
pub type BlockClasses = SmallVec<[BlockClassSpec; 3]>;

/// Saturating sum of `size × count` over a set of block classes.
pub fn configured_total(classes: &[BlockClassSpec]) -> u64 {
    classes
        .iter()
        .fold(0u64, |acc, spec| acc.saturating_add(spec.total_bytes()))
}

/// Opaque reference to a block handed out by an engine pool.
///
/// The engine chooses `id`; this crate only passes it back on
/// deallocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// Tier the block was taken from.
    pub tier: BlockTier,
    /// Engine-assigned identifier.
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_bytes_saturates() {
        let spec = BlockClassSpec {
            tier: BlockTier::Large,
            size: u64::MAX,
            count: 2,
            purpose: "overflow",
        };
        assert_eq!(spec.total_bytes(), u64::MAX);
        assert_eq!(configured_total(&[spec, spec]), u64::MAX);
    }

    #[test]
    fn zero_count_contributes_nothing() {
        let spec = BlockClassSpec {
            tier: BlockTier::Small,
            size: 4 * KIB,
            count: 0,
            purpose: "unused",
        };
        assert_eq!(configured_total(&[spec]), 0);
    }

    #[test]
    fn key_fragments() {
        let frags: Vec<_> = BlockTier::ALL.iter().map(|t| t.key_fragment()).collect();
        assert_eq!(frags, ["LARGE", "MEDIUM", "SMALL"]);
    }
}
