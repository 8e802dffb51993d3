//! Decoded block-layout reports.
//!
//! Engines report their configured blocks either as an object keyed by
//! tier (`{"large": {"block_size": .., "block_count": ..}, ..}`) or as an
//! array of such entries. [`BlockLayout::decode`] turns the raw report into
//! a tagged variant once, so consumers never branch on JSON shape again.

use indexmap::IndexMap;
use serde_json::Value;

/// One reported block entry. Either field may be absent when the engine's
/// schema drifts; such entries cannot be accounted for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportedBlock {
    /// Block size in bytes, if reported as a non-negative integer.
    pub size: Option<u64>,
    /// Block count, if reported as a non-negative integer.
    pub count: Option<u64>,
}

impl ReportedBlock {
    /// Read an entry. Accepts `block_size`/`block_count` and the shorter
    /// `size`/`count` spellings; anything that is not an object decodes
    /// to an entry with neither field.
    pub fn decode(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let field = |long: &str, short: &str| {
            obj.get(long)
                .or_else(|| obj.get(short))
                .and_then(Value::as_u64)
        };
        Self {
            size: field("block_size", "size"),
            count: field("block_count", "count"),
        }
    }

    /// `size × count` (saturating), or `None` if either is missing.
    pub fn bytes(&self) -> Option<u64> {
        Some(self.size?.saturating_mul(self.count?))
    }
}

/// A block layout report after shape decoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockLayout {
    /// Object keyed by tier or block name, in report order.
    Mapping(IndexMap<String, ReportedBlock>),
    /// Array of entries.
    Sequence(Vec<ReportedBlock>),
    /// Neither an object nor an array; holds the JSON kind that was found.
    Unrecognized(&'static str),
}

impl BlockLayout {
    /// Decode a raw engine report.
    pub fn decode(report: &Value) -> Self {
        match report {
            Value::Object(map) => Self::Mapping(
                map.iter()
                    .map(|(k, v)| (k.clone(), ReportedBlock::decode(v)))
                    .collect(),
            ),
            Value::Array(items) => Self::Sequence(items.iter().map(ReportedBlock::decode).collect()),
            Value::Null => Self::Unrecognized("null"),
            Value::Bool(_) => Self::Unrecognized("bool"),
            Value::Number(_) => Self::Unrecognized("number"),
            Value::String(_) => Self::Unrecognized("string"),
        }
    }

    /// Entries with a display label (map key, or `#index` for sequences).
    /// Empty for [`BlockLayout::Unrecognized`].
    pub fn entries(&self) -> Vec<(String, ReportedBlock)> {
        match self {
            Self::Mapping(map) => map.iter().map(|(k, b)| (k.clone(), *b)).collect(),
            Self::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(i, b)| (format!("#{i}"), *b))
                .collect(),
            Self::Unrecognized(_) => Vec::new(),
        }
    }

    /// Whether the report had a shape that can be accounted.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }
}
