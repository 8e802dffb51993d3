//! The flat override map and its quantity coercion rules.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use scenepool_core::{BlockTier, SceneType};

/// A single override value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// A size, count or memory amount, already coerced.
    Quantity(u64),
    /// Any value under a key that does not name a quantity.
    Other(Value),
}

/// Whether a key names a quantity and must hold a non-negative integer.
pub fn is_quantity_key(key: &str) -> bool {
    key.contains("MEMORY") || key.contains("SIZE") || key.contains("COUNT")
}

/// `<PREFIX>_<TIER>_BLOCK_SIZE` for a scenario and tier.
pub fn block_size_key(scene: &SceneType, tier: BlockTier) -> String {
    format!("{}_{}_BLOCK_SIZE", scene.tier_prefix(), tier.key_fragment())
}

/// `<PREFIX>_<TIER>_BLOCK_COUNT` for a scenario and tier.
pub fn block_count_key(scene: &SceneType, tier: BlockTier) -> String {
    format!("{}_{}_BLOCK_COUNT", scene.tier_prefix(), tier.key_fragment())
}

/// Coerce a quantity value. Non-negative integers pass through and
/// all-digit strings are parsed; anything else becomes 0 with a warning.
pub(crate) fn coerce_quantity(key: &str, value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    let coerced = match value {
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
            s.parse::<u64>().unwrap_or(0)
        }
        _ => 0,
    };
    tracing::warn!(key, %value, coerced, "config value is not an integer, coercing");
    coerced
}

/// Ordered key→value overrides.
///
/// Lookups never fail: an absent key simply means "use the default".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigOverrides {
    entries: IndexMap<String, ConfigValue>,
}

impl ConfigOverrides {
    /// An empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed JSON object, coercing quantity keys.
    pub fn from_object(object: Map<String, Value>) -> Self {
        let entries = object
            .into_iter()
            .map(|(key, value)| {
                let value = if is_quantity_key(&key) {
                    ConfigValue::Quantity(coerce_quantity(&key, &value))
                } else {
                    ConfigValue::Other(value)
                };
                (key, value)
            })
            .collect();
        Self { entries }
    }

    /// Set a quantity override, replacing any previous value.
    pub fn set_quantity(&mut self, key: impl Into<String>, value: u64) -> &mut Self {
        self.entries.insert(key.into(), ConfigValue::Quantity(value));
        self
    }

    /// The quantity stored under `key`, if any.
    pub fn quantity(&self, key: &str) -> Option<u64> {
        match self.entries.get(key)? {
            ConfigValue::Quantity(n) => Some(*n),
            ConfigValue::Other(_) => None,
        }
    }

    /// Raw entry under `key`.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no overrides.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render back into a JSON object.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .entries
            .iter()
            .map(|(k, v)| {
                let v = match v {
                    ConfigValue::Quantity(n) => Value::from(*n),
                    ConfigValue::Other(v) => v.clone(),
                };
                (k.clone(), v)
            })
            .collect();
        Value::Object(object)
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for ConfigOverrides {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut overrides = Self::new();
        for (k, v) in iter {
            overrides.set_quantity(k, v);
        }
        overrides
    }
}
