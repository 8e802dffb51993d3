//! A ready-to-edit sample override document.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use scenepool_core::MIB;

use crate::error::ConfigError;
use crate::overrides::ConfigOverrides;

/// Overrides that restate the public-service-screen tiers and the three
/// scenario budgets, as a starting point for deployments.
pub fn sample_overrides() -> ConfigOverrides {
    [
        ("PUBLIC_SERVICE_SCREEN_TOTAL_MEMORY", 512 * MIB),
        ("PS_LARGE_BLOCK_SIZE", 64 * MIB),
        ("PS_LARGE_BLOCK_COUNT", 4),
        ("PS_SMALL_BLOCK_SIZE", 32 * 1024),
        ("PS_SMALL_BLOCK_COUNT", 1024),
        ("VEHICLE_TOTAL_MEMORY", 1024 * MIB),
        ("VIRTUAL_IP_TOTAL_MEMORY", 2048 * MIB),
    ]
    .into_iter()
    .collect()
}

/// Write [`sample_overrides`] to `path` as pretty-printed JSON.
pub fn write_sample(path: &Path) -> Result<(), ConfigError> {
    let write_err = |source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &sample_overrides().to_json())
        .map_err(|e| write_err(e.into()))?;
    writer.write_all(b"\n").map_err(write_err)?;
    writer.flush().map_err(write_err)?;
    tracing::info!(path = %path.display(), "wrote sample config");
    Ok(())
}
