//! Scenario identity.

use std::fmt;
use std::str::FromStr;

/// Identifies the deployment scenario a pool is sized for.
///
/// The three built-in scenarios carry a static profile (see
/// [`profile`](crate::profile)). [`SceneType::Other`] names a scenario with
/// no built-in profile; whether it is accepted is a policy decision made by
/// the pool initializer, never by the profile table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneType {
    /// Public service screens: embedded kiosk-class devices.
    PublicServiceScreen,
    /// In-vehicle displays: motion-frame caching and sensor traffic.
    Vehicle,
    /// Virtual IP characters: 4K textures and high-detail assets.
    VirtualIp,
    /// A scenario without a built-in profile.
    ///
    /// The name must not fold to a built-in scenario: `Other("vehicle")`
    /// would read `VEHICLE_TOTAL_MEMORY` with `GEN_*` tier keys and be a
    /// registry key distinct from [`SceneType::Vehicle`]. Build scenes from
    /// names with [`SceneType::named`] or `parse`.
    Other(String),
}

impl SceneType {
    /// Scenarios with a built-in profile, in declaration order.
    pub const KNOWN: [SceneType; 3] = [
        SceneType::PublicServiceScreen,
        SceneType::Vehicle,
        SceneType::VirtualIp,
    ];

    /// Scene for `name`, normalizing built-in names to their variant.
    ///
    /// Case and separators are ignored when matching: `vehicle`,
    /// `VEHICLE` and `Vehicle` are all [`SceneType::Vehicle`].
    pub fn named(name: &str) -> Self {
        let folded: String = name
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "publicservicescreen" => Self::PublicServiceScreen,
            "vehicle" => Self::Vehicle,
            "virtualip" => Self::VirtualIp,
            _ => Self::Other(name.to_string()),
        }
    }

    /// Upper-snake-case name used to build `<SCENE>_TOTAL_MEMORY` keys.
    pub fn config_key(&self) -> String {
        match self {
            Self::PublicServiceScreen => "PUBLIC_SERVICE_SCREEN".to_string(),
            Self::Vehicle => "VEHICLE".to_string(),
            Self::VirtualIp => "VIRTUAL_IP".to_string(),
            Self::Other(name) => name
                .chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() {
                        c.to_ascii_uppercase()
                    } else {
                        '_'
                    }
                })
                .collect(),
        }
    }

    /// Prefix for per-tier keys (`<PREFIX>_<TIER>_BLOCK_SIZE`).
    pub fn tier_prefix(&self) -> &'static str {
        match self {
            Self::PublicServiceScreen => "PS",
            Self::Vehicle => "V",
            Self::VirtualIp => "VIP",
            Self::Other(_) => "GEN",
        }
    }

    /// The override key for this scenario's total memory budget.
    pub fn total_memory_key(&self) -> String {
        format!("{}_TOTAL_MEMORY", self.config_key())
    }

    /// Whether this scenario has a built-in profile.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for SceneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Other(name) => write!(f, "{name}"),
            known => write!(f, "{}", known.config_key()),
        }
    }
}

impl FromStr for SceneType {
    type Err = std::convert::Infallible;

    /// Same as [`SceneType::named`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::named(s))
    }
}
