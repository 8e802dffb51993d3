//! Initialization, monitor, and registry options.

use std::time::Duration;

use scenepool_core::Feature;

use crate::error::PoolError;
use crate::features::DEFAULT_FEATURES;

// ── MonitorConfig ─────────────────────────────────────────────────

/// Timing of the per-pool background monitor.
#[derive(Clone, Debug, PartialEq)]
pub struct MonitorConfig {
    /// Time between usage samples. Default: 5 minutes.
    pub sample_interval: Duration,
    /// Pause after a failed sample before retrying. Default: 1 minute.
    pub error_backoff: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_secs(300),
            error_backoff: Duration::from_secs(60),
        }
    }
}

// ── RegistryConfig ────────────────────────────────────────────────

/// Shutdown behaviour of a [`PoolRegistry`](crate::registry::PoolRegistry).
#[derive(Clone, Debug, PartialEq)]
pub struct RegistryConfig {
    /// How long `stop_all` waits for each monitor before abandoning it.
    /// Default: 5 seconds.
    pub stop_timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            stop_timeout: Duration::from_secs(5),
        }
    }
}

// ── InitOptions ───────────────────────────────────────────────────

/// Options for [`PoolInitializer`](crate::initializer::PoolInitializer).
#[derive(Clone, Debug, PartialEq)]
pub struct InitOptions {
    /// Hard wall-clock limit for engine pool construction. Default: 30 s.
    pub construction_timeout: Duration,
    /// Features to try enabling after configuration, in order.
    pub features: Vec<Feature>,
    /// Accept scenarios without a built-in profile by configuring the
    /// generic single-tier profile. Default: `false` (such scenarios fail
    /// with `UnsupportedScene`).
    pub generic_fallback: bool,
    /// Monitor timing for pools built with these options.
    pub monitor: MonitorConfig,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            construction_timeout: Duration::from_secs(30),
            features: DEFAULT_FEATURES.to_vec(),
            generic_fallback: false,
            monitor: MonitorConfig::default(),
        }
    }
}

impl InitOptions {
    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.construction_timeout.is_zero() {
            return Err(PoolError::InvalidOptions {
                reason: "construction_timeout must be non-zero".to_string(),
            });
        }
        if self.monitor.sample_interval.is_zero() {
            return Err(PoolError::InvalidOptions {
                reason: "monitor.sample_interval must be non-zero".to_string(),
            });
        }
        if self.monitor.error_backoff.is_zero() {
            return Err(PoolError::InvalidOptions {
                reason: "monitor.error_backoff must be non-zero".to_string(),
            });
        }
        for feature in &self.features {
            let fraction = match *feature {
                Feature::MemoryReuse => continue,
                Feature::FragmentationCleanup { threshold } => threshold,
                Feature::AutoExpansion { utilization } => utilization,
            };
            if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
                return Err(PoolError::InvalidOptions {
                    reason: format!("{feature}: argument must be in [0.0, 1.0]"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let opts = InitOptions::default();
        assert_eq!(opts.construction_timeout, Duration::from_secs(30));
        assert_eq!(opts.monitor.sample_interval, Duration::from_secs(300));
        assert_eq!(opts.monitor.error_backoff, Duration::from_secs(60));
        assert!(!opts.generic_fallback);
        assert_eq!(opts.features.len(), 3);
        assert_eq!(RegistryConfig::default().stop_timeout, Duration::from_secs(5));
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let opts = InitOptions {
            construction_timeout: Duration::ZERO,
            ..InitOptions::default()
        };
        match opts.validate() {
            Err(PoolError::InvalidOptions { .. }) => {}
            other => panic!("expected InvalidOptions, got {other:?}"),
        }
    }

    #[test]
    fn zero_sample_interval_rejected() {
        let mut opts = InitOptions::default();
        opts.monitor.sample_interval = Duration::ZERO;
        assert!(opts.validate().is_err());
    }

    #[test]
    fn out_of_range_feature_argument_rejected() {
        let opts = InitOptions {
            features: vec![Feature::AutoExpansion { utilization: 1.5 }],
            ..InitOptions::default()
        };
        assert!(opts.validate().is_err());

        let opts = InitOptions {
            features: vec![Feature::FragmentationCleanup {
                threshold: f64::NAN,
            }],
            ..InitOptions::default()
        };
        assert!(opts.validate().is_err());
    }
}
