//! Errors returned by pool initialization.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use scenepool_config::ConfigError;
use scenepool_core::{EngineError, ProfileError, SceneType};

/// Why a pool could not be initialized.
///
/// Every variant is fatal to the `initialize` call that produced it, and
/// none of them leaves a registry entry behind.
#[derive(Debug)]
pub enum PoolError {
    /// The scenario has no built-in profile and generic fallback is off.
    UnsupportedScene {
        /// The requested scenario.
        scene: SceneType,
    },
    /// The override document was missing or malformed.
    Config(ConfigError),
    /// Engine pool construction did not finish within the time budget.
    /// The construction worker was abandoned.
    CreationTimeout {
        /// The budget that elapsed.
        timeout: Duration,
    },
    /// The engine failed while constructing or configuring the pool.
    EngineConstruction(EngineError),
    /// The configured layout failed the budget check.
    Validation {
        /// What the check found.
        reason: String,
    },
    /// A construction worker or monitor thread could not be started.
    ThreadSpawnFailed {
        /// Which thread, and the OS error.
        reason: String,
    },
    /// [`InitOptions`](crate::config::InitOptions) violated an invariant.
    InvalidOptions {
        /// Which invariant.
        reason: String,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedScene { scene } => write!(f, "unsupported scene type: {scene}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::CreationTimeout { timeout } => {
                write!(f, "memory pool creation timed out after {timeout:?}")
            }
            Self::EngineConstruction(e) => write!(f, "pool construction failed: {e}"),
            Self::Validation { reason } => write!(f, "pool validation failed: {reason}"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
            Self::InvalidOptions { reason } => write!(f, "invalid init options: {reason}"),
        }
    }
}

impl Error for PoolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::EngineConstruction(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for PoolError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<ProfileError> for PoolError {
    fn from(e: ProfileError) -> Self {
        match e {
            ProfileError::UnsupportedScene { scene } => Self::UnsupportedScene { scene },
        }
    }
}

impl From<EngineError> for PoolError {
    fn from(e: EngineError) -> Self {
        Self::EngineConstruction(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn timeout_display() {
        let err = PoolError::CreationTimeout {
            timeout: Duration::from_secs(30),
        };
        assert_eq!(err.to_string(), "memory pool creation timed out after 30s");
    }

    #[test]
    fn config_error_is_source() {
        let err = PoolError::from(ConfigError::NotFound {
            path: PathBuf::from("x.json"),
        });
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("config: "));
    }

    #[test]
    fn profile_error_converts_to_unsupported_scene() {
        let scene = SceneType::Other("kiosk".into());
        let err = PoolError::from(ProfileError::UnsupportedScene {
            scene: scene.clone(),
        });
        match err {
            PoolError::UnsupportedScene { scene: s } => assert_eq!(s, scene),
            other => panic!("expected UnsupportedScene, got {other:?}"),
        }
    }
}
