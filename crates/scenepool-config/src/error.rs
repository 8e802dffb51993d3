//! Override document errors.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Errors surfaced while loading an override document.
///
/// Only a missing file and malformed content are errors; other I/O
/// failures degrade to an empty override set with a warning.
#[derive(Debug)]
pub enum ConfigError {
    /// The path does not resolve to a file.
    NotFound {
        /// The path that was requested.
        path: PathBuf,
    },
    /// The document is not a well-formed flat JSON object.
    Parse {
        /// The document's path.
        path: PathBuf,
        /// Parser description, including line and column when known.
        reason: String,
    },
    /// Writing a document failed.
    Write {
        /// The destination path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => {
                write!(f, "config file not found: {}", path.display())
            }
            Self::Parse { path, reason } => {
                write!(f, "malformed config file {}: {reason}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "failed to write config file {}: {source}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Write { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_path() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("/etc/pools.json"),
        };
        assert_eq!(err.to_string(), "config file not found: /etc/pools.json");

        let err = ConfigError::Parse {
            path: PathBuf::from("pools.json"),
            reason: "expected value at line 1 column 1".into(),
        };
        assert!(err.to_string().contains("pools.json"));
        assert!(err.to_string().contains("line 1"));
    }
}
