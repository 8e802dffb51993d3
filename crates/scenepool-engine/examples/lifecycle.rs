//! Scenepool lifecycle: sample config, two scenes, probe, shutdown.
//!
//! Demonstrates:
//!   1. Writing the sample override document
//!   2. Initializing pools for two scenes from it
//!   3. Running an allocation probe and printing a metrics snapshot
//!   4. Shutting down the monitors
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example lifecycle

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use scenepool_core::{BlockTier, SceneType};
use scenepool_engine::{InitOptions, PoolManager, RegistryConfig};
use scenepool_test_utils::MockEngine;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("memory_pool_config.json");
    scenepool_config::write_sample(&config_path)?;

    // ─── Initialize ─────────────────────────────────────────────

    let engine = Arc::new(MockEngine::new().with_construction_delay(Duration::from_millis(50)));
    let options = InitOptions {
        construction_timeout: Duration::from_secs(5),
        ..InitOptions::default()
    };
    let manager = PoolManager::with_options(engine, options, RegistryConfig::default())?;

    for scene in [SceneType::PublicServiceScreen, SceneType::Vehicle] {
        let pool = manager.initialize(&scene, Some(&config_path))?;
        println!("{scene}: {} MiB pool ready", pool.total_memory() >> 20);
    }

    // ─── Probe ──────────────────────────────────────────────────

    for (scene, tier) in [
        (SceneType::PublicServiceScreen, BlockTier::Small),
        (SceneType::Vehicle, BlockTier::Medium),
    ] {
        if let Some(report) = manager.probe(&scene, tier, 1000) {
            println!(
                "{scene} {tier}: {}/{} ok, {:?} per op",
                report.succeeded,
                report.iterations,
                report.avg_per_op()
            );
        }
        if let Some(snapshot) = manager.snapshot(&scene) {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    // ─── Shutdown ───────────────────────────────────────────────

    let report = manager.shutdown();
    println!(
        "shutdown: {} joined, {} abandoned in {} ms",
        report.monitors_joined, report.monitors_abandoned, report.total_ms
    );
    Ok(())
}
