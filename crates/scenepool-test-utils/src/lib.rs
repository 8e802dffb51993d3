//! Test utilities and mock engines for scenepool development.
//!
//! [`MockEngine`] implements [`MemoryEngine`] with scriptable behaviour:
//! slow, failing or panicking construction, a chosen layout report shape,
//! drifted report entries, missing capabilities, failing features and a
//! scripted sequence of usage samples. Every pool it creates is kept so
//! tests can inspect what the code under test did to it.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use scenepool_core::{
    Block, BlockClassSpec, BlockTier, Capability, EngineError, Feature, MemoryEngine, MemoryPool,
    PoolHandle, UsageStats,
};
use serde_json::{json, Map, Value};

/// Shape of the layout report a [`MockPool`] returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutShape {
    /// `{"large": {"block_size": .., "block_count": ..}, ..}`
    Mapping,
    /// `[{"block_size": .., "block_count": ..}, ..]`
    Sequence,
    /// A bare string.
    Scalar,
}

/// One scripted response of [`MemoryPool::usage_stats`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsageSample {
    Used(u64),
    Fail(String),
    Panic,
}

#[derive(Clone, Debug)]
struct Behavior {
    construction_delay: Option<Duration>,
    construction_failure: Option<String>,
    construction_panic: bool,
    capabilities: Vec<Capability>,
    feature_failures: Vec<Capability>,
    usage_script: Vec<UsageSample>,
    usage_delay: Option<Duration>,
    add_block_failure: Option<String>,
    block_config_failure: Option<String>,
    layout_shape: LayoutShape,
    drift_entries: Vec<Value>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            construction_delay: None,
            construction_failure: None,
            construction_panic: false,
            capabilities: vec![
                Capability::MemoryReuse,
                Capability::FragmentationCleanup,
                Capability::AutoExpansion,
                Capability::UsageStats,
            ],
            feature_failures: Vec::new(),
            usage_script: Vec::new(),
            usage_delay: None,
            add_block_failure: None,
            block_config_failure: None,
            layout_shape: LayoutShape::Mapping,
            drift_entries: Vec::new(),
        }
    }
}

// ── MockEngine ────────────────────────────────────────────────────

/// Scriptable in-memory engine.
#[derive(Default)]
pub struct MockEngine {
    behavior: Behavior,
    attempts: AtomicUsize,
    pools: Mutex<Vec<Arc<MockPool>>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside `create_pool`.
    pub fn with_construction_delay(mut self, delay: Duration) -> Self {
        self.behavior.construction_delay = Some(delay);
        self
    }

    pub fn with_construction_failure(mut self, reason: impl Into<String>) -> Self {
        self.behavior.construction_failure = Some(reason.into());
        self
    }

    pub fn with_construction_panic(mut self) -> Self {
        self.behavior.construction_panic = true;
        self
    }

    /// Replace the advertised capability set (default: all of them).
    pub fn with_capabilities(mut self, capabilities: &[Capability]) -> Self {
        self.behavior.capabilities = capabilities.to_vec();
        self
    }

    /// Advertise `capability` but fail when its feature is enabled.
    pub fn with_feature_failure(mut self, capability: Capability) -> Self {
        self.behavior.feature_failures.push(capability);
        self
    }

    /// Responses for successive `usage_stats` calls. Once exhausted, the
    /// pool reports the bytes held by outstanding blocks.
    pub fn with_usage_script(mut self, script: Vec<UsageSample>) -> Self {
        self.behavior.usage_script = script;
        self
    }

    /// Sleep this long inside every `usage_stats` call.
    pub fn with_usage_delay(mut self, delay: Duration) -> Self {
        self.behavior.usage_delay = Some(delay);
        self
    }

    pub fn with_add_block_failure(mut self, reason: impl Into<String>) -> Self {
        self.behavior.add_block_failure = Some(reason.into());
        self
    }

    pub fn with_block_config_failure(mut self, reason: impl Into<String>) -> Self {
        self.behavior.block_config_failure = Some(reason.into());
        self
    }

    pub fn with_layout_shape(mut self, shape: LayoutShape) -> Self {
        self.behavior.layout_shape = shape;
        self
    }

    /// Append a raw entry to every layout report, e.g. one missing
    /// `block_count`.
    pub fn with_drift_entry(mut self, entry: Value) -> Self {
        self.behavior.drift_entries.push(entry);
        self
    }

    /// Pools successfully created so far, in creation order.
    pub fn pools(&self) -> Vec<Arc<MockPool>> {
        self.pools.lock().unwrap().clone()
    }

    /// Number of pools successfully created.
    pub fn created(&self) -> usize {
        self.pools.lock().unwrap().len()
    }

    /// Number of `create_pool` calls, including failed and pending ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl MemoryEngine for MockEngine {
    fn create_pool(&self, total_memory: u64) -> Result<PoolHandle, EngineError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.behavior.construction_delay {
            thread::sleep(delay);
        }
        if self.behavior.construction_panic {
            panic!("mock engine construction panic");
        }
        if let Some(reason) = &self.behavior.construction_failure {
            return Err(EngineError::new("create_pool", reason.clone()));
        }
        let pool = Arc::new(MockPool::new(total_memory, self.behavior.clone()));
        self.pools.lock().unwrap().push(Arc::clone(&pool));
        Ok(pool)
    }
}

// ── MockPool ──────────────────────────────────────────────────────

/// Pool created by [`MockEngine`]. Hands out blocks up to each tier's
/// configured count.
pub struct MockPool {
    total_memory: u64,
    behavior: Behavior,
    classes: Mutex<Vec<BlockClassSpec>>,
    outstanding: Mutex<HashMap<BlockTier, u64>>,
    enabled: Mutex<Vec<Feature>>,
    usage_script: Mutex<VecDeque<UsageSample>>,
    usage_calls: AtomicUsize,
    next_block: AtomicU64,
}

impl MockPool {
    fn new(total_memory: u64, behavior: Behavior) -> Self {
        let usage_script = behavior.usage_script.iter().cloned().collect();
        Self {
            total_memory,
            behavior,
            classes: Mutex::new(Vec::new()),
            outstanding: Mutex::new(HashMap::new()),
            enabled: Mutex::new(Vec::new()),
            usage_script: Mutex::new(usage_script),
            usage_calls: AtomicUsize::new(0),
            next_block: AtomicU64::new(0),
        }
    }

    /// Block classes added so far, in order.
    pub fn block_classes(&self) -> Vec<BlockClassSpec> {
        self.classes.lock().unwrap().clone()
    }

    /// Features successfully enabled, in order.
    pub fn enabled_features(&self) -> Vec<Feature> {
        self.enabled.lock().unwrap().clone()
    }

    /// Number of `usage_stats` calls.
    pub fn usage_calls(&self) -> usize {
        self.usage_calls.load(Ordering::SeqCst)
    }

    /// Blocks currently handed out from `tier`.
    pub fn outstanding(&self, tier: BlockTier) -> u64 {
        self.outstanding.lock().unwrap().get(&tier).copied().unwrap_or(0)
    }

    fn capacity(&self, tier: BlockTier) -> (u64, u64) {
        let classes = self.classes.lock().unwrap();
        let count = classes.iter().filter(|c| c.tier == tier).map(|c| c.count).sum();
        let size = classes.iter().find(|c| c.tier == tier).map_or(0, |c| c.size);
        (count, size)
    }

    fn used_bytes(&self) -> (u64, u64) {
        let outstanding = self.outstanding.lock().unwrap().clone();
        outstanding.iter().fold((0, 0), |(bytes, blocks), (&tier, &n)| {
            (bytes + n * self.capacity(tier).1, blocks + n)
        })
    }

    fn report_entry(spec: &BlockClassSpec) -> Value {
        json!({
            "block_size": spec.size,
            "block_count": spec.count,
            "purpose": spec.purpose,
        })
    }
}

impl MemoryPool for MockPool {
    fn total_memory(&self) -> u64 {
        self.total_memory
    }

    fn add_block_class(&self, spec: &BlockClassSpec) -> Result<(), EngineError> {
        if let Some(reason) = &self.behavior.add_block_failure {
            return Err(EngineError::new("add_block_class", reason.clone()));
        }
        self.classes.lock().unwrap().push(*spec);
        Ok(())
    }

    fn allocate(&self, tier: BlockTier) -> Option<Block> {
        let (capacity, _) = self.capacity(tier);
        let mut outstanding = self.outstanding.lock().unwrap();
        let held = outstanding.entry(tier).or_insert(0);
        if *held >= capacity {
            return None;
        }
        *held += 1;
        Some(Block {
            tier,
            id: self.next_block.fetch_add(1, Ordering::SeqCst),
        })
    }

    fn deallocate(&self, block: Block) {
        let mut outstanding = self.outstanding.lock().unwrap();
        if let Some(held) = outstanding.get_mut(&block.tier) {
            *held = held.saturating_sub(1);
        }
    }

    fn supports(&self, capability: Capability) -> bool {
        self.behavior.capabilities.contains(&capability)
    }

    fn enable_feature(&self, feature: Feature) -> Result<(), EngineError> {
        if self.behavior.feature_failures.contains(&feature.capability()) {
            return Err(EngineError::new(
                "enable_feature",
                format!("{feature} rejected by mock"),
            ));
        }
        self.enabled.lock().unwrap().push(feature);
        Ok(())
    }

    fn block_config(&self) -> Result<Value, EngineError> {
        if let Some(reason) = &self.behavior.block_config_failure {
            return Err(EngineError::new("block_config", reason.clone()));
        }
        let classes = self.block_classes();
        let report = match self.behavior.layout_shape {
            LayoutShape::Mapping => {
                let mut map = Map::new();
                for (i, spec) in classes.iter().enumerate() {
                    let key = if map.contains_key(spec.tier.name()) {
                        format!("{}_{i}", spec.tier)
                    } else {
                        spec.tier.name().to_string()
                    };
                    map.insert(key, Self::report_entry(spec));
                }
                for (i, entry) in self.behavior.drift_entries.iter().enumerate() {
                    map.insert(format!("drift_{i}"), entry.clone());
                }
                Value::Object(map)
            }
            LayoutShape::Sequence => Value::Array(
                classes
                    .iter()
                    .map(Self::report_entry)
                    .chain(self.behavior.drift_entries.iter().cloned())
                    .collect(),
            ),
            LayoutShape::Scalar => Value::String("opaque layout".to_string()),
        };
        Ok(report)
    }

    fn usage_stats(&self) -> Result<UsageStats, EngineError> {
        self.usage_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.behavior.usage_delay {
            thread::sleep(delay);
        }
        // Release the lock before a scripted panic.
        let next = self.usage_script.lock().unwrap().pop_front();
        match next {
            Some(UsageSample::Used(used_memory)) => Ok(UsageStats {
                used_memory,
                allocated_blocks: 0,
            }),
            Some(UsageSample::Fail(reason)) => Err(EngineError::new("usage_stats", reason)),
            Some(UsageSample::Panic) => panic!("mock engine usage panic"),
            None => {
                let (used_memory, allocated_blocks) = self.used_bytes();
                Ok(UsageStats {
                    used_memory,
                    allocated_blocks,
                })
            }
        }
    }
}
