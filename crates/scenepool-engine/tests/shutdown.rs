//! Integration test: monitor sampling and bounded shutdown.
//!
//! Monitors sleeping through a long interval must stop promptly when the
//! registry shuts down, a monitor stuck inside an engine call must be
//! abandoned after the stop timeout, and in every case the monitor set
//! must be empty afterwards.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use scenepool_core::{BlockTier, SceneType};
use scenepool_engine::{InitOptions, MonitorConfig, PoolManager, RegistryConfig};
use scenepool_test_utils::{MockEngine, UsageSample};

fn fast_monitor() -> InitOptions {
    InitOptions {
        monitor: MonitorConfig {
            sample_interval: Duration::from_millis(10),
            error_backoff: Duration::from_millis(10),
        },
        ..InitOptions::default()
    }
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn shutdown_interrupts_sleeping_monitors() {
    let engine = Arc::new(MockEngine::new());
    let manager = PoolManager::new(engine.clone()).unwrap();
    for scene in SceneType::KNOWN {
        manager.initialize(&scene, None).unwrap();
    }
    // Every monitor has taken its first sample and is now in a 5-minute sleep.
    assert!(wait_until(|| engine.pools().iter().all(|p| p.usage_calls() >= 1)));

    let start = Instant::now();
    let report = manager.shutdown();
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_secs(15), "took {elapsed:?}");
    assert_eq!(report.monitors_joined, 3);
    assert_eq!(report.monitors_abandoned, 0);
    assert_eq!(manager.registry().monitor_count(), 0);
}

#[test]
fn stuck_monitor_is_abandoned_after_stop_timeout() {
    let engine = Arc::new(MockEngine::new().with_usage_delay(Duration::from_secs(2)));
    let manager = PoolManager::with_options(
        engine.clone(),
        fast_monitor(),
        RegistryConfig {
            stop_timeout: Duration::from_millis(50),
        },
    )
    .unwrap();
    manager.initialize(&SceneType::Vehicle, None).unwrap();
    assert!(wait_until(|| engine.pools()[0].usage_calls() >= 1));

    let start = Instant::now();
    let report = manager.shutdown();
    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(report.monitors_abandoned, 1);
    assert_eq!(manager.registry().monitor_count(), 0);
}

#[test]
fn monitor_tracks_peak_usage() {
    let engine = Arc::new(MockEngine::new());
    let manager =
        PoolManager::with_options(engine.clone(), fast_monitor(), RegistryConfig::default())
            .unwrap();
    let pool = manager.initialize(&SceneType::VirtualIp, None).unwrap();
    let metrics = manager.metrics(&SceneType::VirtualIp).unwrap();

    let held: Vec<_> = (0..3).map(|_| pool.allocate(BlockTier::Large).unwrap()).collect();
    let peak = 3 * 256 * 1024 * 1024;
    assert!(wait_until(|| metrics.peak_memory_usage() == peak));

    for block in held {
        pool.deallocate(block);
    }
    thread::sleep(Duration::from_millis(50));
    assert_eq!(metrics.peak_memory_usage(), peak, "peak never decreases");
    manager.shutdown();
}

#[test]
fn sampling_errors_do_not_stop_the_monitor() {
    let engine = Arc::new(MockEngine::new().with_usage_script(vec![
        UsageSample::Fail("busy".into()),
        UsageSample::Fail("busy".into()),
        UsageSample::Used(4096),
    ]));
    let manager =
        PoolManager::with_options(engine.clone(), fast_monitor(), RegistryConfig::default())
            .unwrap();
    manager.initialize(&SceneType::Vehicle, None).unwrap();
    let metrics = manager.metrics(&SceneType::Vehicle).unwrap();
    assert!(wait_until(|| metrics.peak_memory_usage() == 4096));
    assert_eq!(manager.shutdown().monitors_joined, 1);
}

#[test]
fn registry_hosts_new_monitors_after_shutdown() {
    let manager = PoolManager::new(Arc::new(MockEngine::new())).unwrap();
    manager.initialize(&SceneType::Vehicle, None).unwrap();
    assert_eq!(manager.shutdown().monitors_joined, 1);

    manager.initialize(&SceneType::PublicServiceScreen, None).unwrap();
    assert_eq!(manager.registry().monitor_count(), 1);
    let report = manager.shutdown();
    assert_eq!(report.monitors_joined, 1);
}

#[test]
fn pool_without_usage_stats_is_never_sampled() {
    let engine = Arc::new(MockEngine::new().with_capabilities(&[]));
    let manager =
        PoolManager::with_options(engine.clone(), fast_monitor(), RegistryConfig::default())
            .unwrap();
    manager.initialize(&SceneType::Vehicle, None).unwrap();
    thread::sleep(Duration::from_millis(50));
    assert_eq!(engine.pools()[0].usage_calls(), 0);
    assert_eq!(manager.metrics(&SceneType::Vehicle).unwrap().peak_memory_usage(), 0);
    manager.shutdown();
}
