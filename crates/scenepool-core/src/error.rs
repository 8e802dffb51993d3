//! Error types shared across the scenepool workspace.

use std::error::Error;
use std::fmt;

use crate::scene::SceneType;

/// Failure reported by the external memory engine.
///
/// The engine is opaque, so the only structure kept is which call failed
/// and the engine's own description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineError {
    /// Engine call that failed (e.g. `"create_pool"`).
    pub operation: &'static str,
    /// Engine-provided description.
    pub reason: String,
}

impl EngineError {
    /// Build an engine error for the given call.
    pub fn new(operation: &'static str, reason: impl Into<String>) -> Self {
        Self {
            operation,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine {} failed: {}", self.operation, self.reason)
    }
}

impl Error for EngineError {}

/// Errors from the static scene profile table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProfileError {
    /// The scenario has no built-in profile.
    UnsupportedScene {
        /// The scenario that was requested.
        scene: SceneType,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedScene { scene } => write!(f, "unsupported scene type: {scene}"),
        }
    }
}

impl Error for ProfileError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_error_display_names_operation() {
        let err = EngineError::new("create_pool", "device busy");
        assert_eq!(err.to_string(), "engine create_pool failed: device busy");
    }

    #[test]
    fn unsupported_scene_display() {
        let err = ProfileError::UnsupportedScene {
            scene: SceneType::Other("kiosk".into()),
        };
        assert_eq!(err.to_string(), "unsupported scene type: kiosk");
    }
}
