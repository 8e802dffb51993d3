//! Post-construction budget check of a pool's reported layout.

use std::fmt;

use scenepool_core::{BlockLayout, EngineError, MemoryPool, MIB};

/// Outcome of checking a layout against its budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayoutCheck {
    /// The accounted total is non-zero and within budget.
    Valid {
        /// Accounted bytes.
        total: u64,
        /// Budget in bytes.
        budget: u64,
    },
    /// The accounted total exceeds the budget.
    OverBudget {
        /// Accounted bytes.
        total: u64,
        /// Budget in bytes.
        budget: u64,
    },
    /// Nothing could be accounted.
    Empty,
    /// The report was neither an object nor an array.
    UnrecognizedShape {
        /// JSON kind that was found.
        found: &'static str,
    },
}

impl LayoutCheck {
    /// Whether the pool may be registered.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

impl fmt::Display for LayoutCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid { total, budget } => write!(
                f,
                "configured {:.1} MiB of {:.1} MiB",
                mib(*total),
                mib(*budget)
            ),
            Self::OverBudget { total, budget } => write!(
                f,
                "configured memory {:.1} MiB exceeds total limit {:.1} MiB",
                mib(*total),
                mib(*budget)
            ),
            Self::Empty => write!(f, "no block memory configured"),
            Self::UnrecognizedShape { found } => {
                write!(f, "unrecognized block layout report: {found}")
            }
        }
    }
}

/// Fetch the pool's layout report and check it against `budget`.
///
/// Only a failing engine call is an `Err`; every layout problem is a
/// non-valid [`LayoutCheck`].
pub fn validate(pool: &dyn MemoryPool, budget: u64) -> Result<LayoutCheck, EngineError> {
    let report = pool.block_config()?;
    let check = check_layout(&BlockLayout::decode(&report), budget);
    if check.is_valid() {
        tracing::debug!(%check, "pool layout validated");
    } else {
        tracing::error!(%check, "pool layout rejected");
    }
    Ok(check)
}

/// Account a decoded layout against `budget`. Entries missing a size or
/// count are skipped with a warning.
pub fn check_layout(layout: &BlockLayout, budget: u64) -> LayoutCheck {
    if let BlockLayout::Unrecognized(found) = layout {
        return LayoutCheck::UnrecognizedShape { found: *found };
    }

    let mut total = 0u64;
    for (label, block) in layout.entries() {
        match block.bytes() {
            Some(bytes) => total = total.saturating_add(bytes),
            None => tracing::warn!(entry = %label, "block entry without size or count, skipping"),
        }
    }

    if total == 0 {
        LayoutCheck::Empty
    } else if total > budget {
        LayoutCheck::OverBudget { total, budget }
    } else {
        LayoutCheck::Valid { total, budget }
    }
}

pub(crate) fn mib(bytes: u64) -> f64 {
    bytes as f64 / MIB as f64
}
