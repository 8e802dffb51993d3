//! Loading override documents from disk.

use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;

use crate::error::ConfigError;
use crate::overrides::ConfigOverrides;

/// Load and coerce an override document.
///
/// - Missing file: [`ConfigError::NotFound`].
/// - Invalid JSON, or a root that is not an object: [`ConfigError::Parse`].
/// - Any other read failure (permissions, a directory, non-UTF-8 bytes):
///   an empty override set, logged as a warning, so pool construction can
///   proceed with defaults.
pub fn load(path: &Path) -> Result<ConfigOverrides, ConfigError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::error!(path = %path.display(), "config file not found");
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file, using defaults"
            );
            return Ok(ConfigOverrides::new());
        }
    };

    let text = match std::str::from_utf8(&bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "config file is not valid UTF-8, using defaults"
            );
            return Ok(ConfigOverrides::new());
        }
    };

    let document: Value = serde_json::from_str(text).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "config file is not valid JSON");
        ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    match document {
        Value::Object(object) => {
            let overrides = ConfigOverrides::from_object(object);
            tracing::debug!(path = %path.display(), entries = overrides.len(), "loaded config overrides");
            Ok(overrides)
        }
        other => {
            let reason = format!("expected a JSON object at the top level, found {}", kind(&other));
            tracing::error!(path = %path.display(), %reason, "config file has the wrong shape");
            Err(ConfigError::Parse {
                path: path.to_path_buf(),
                reason,
            })
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn load_valid_document() {
        let file = write_temp(br#"{"VEHICLE_TOTAL_MEMORY": 100, "V_LARGE_BLOCK_COUNT": "3"}"#);
        let o = load(file.path()).unwrap();
        assert_eq!(o.quantity("VEHICLE_TOTAL_MEMORY"), Some(100));
        assert_eq!(o.quantity("V_LARGE_BLOCK_COUNT"), Some(3));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        match load(&path) {
            Err(ConfigError::NotFound { path: p }) => assert_eq!(p, path),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let file = write_temp(b"{\"VEHICLE_TOTAL_MEMORY\": ");
        match load(file.path()) {
            Err(ConfigError::Parse { .. }) => {}
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn non_object_root_is_parse_error() {
        let file = write_temp(b"[1, 2, 3]");
        match load(file.path()) {
            Err(ConfigError::Parse { reason, .. }) => assert!(reason.contains("an array")),
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn directory_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let o = load(dir.path()).unwrap();
        assert!(o.is_empty());
    }

    #[test]
    fn non_utf8_degrades_to_empty() {
        let file = write_temp(&[0x7b, 0xff, 0xfe, 0x7d]);
        let o = load(file.path()).unwrap();
        assert!(o.is_empty());
    }
}
