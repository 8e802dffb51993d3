//! Reusable fixtures for lifecycle tests.
//!
//! - [`GatedEngine`]: construction blocks until the test opens the gate,
//!   for observing what happens to late results after a timeout.
//! - [`mapping_report`] / [`sequence_report`]: raw layout reports in the
//!   two shapes engines use.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use scenepool_core::{BlockClassSpec, EngineError, MemoryEngine, PoolHandle};
use serde_json::{json, Map, Value};

use crate::MockEngine;

/// Engine whose `create_pool` waits until [`open`](GatedEngine::open) is
/// called (or a safety deadline passes), then delegates to a default
/// [`MockEngine`].
pub struct GatedEngine {
    gate: Gate,
    inner: MockEngine,
    completed: AtomicUsize,
}

impl GatedEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Gate::new(),
            inner: MockEngine::new(),
            completed: AtomicUsize::new(0),
        })
    }

    /// Let every blocked and future `create_pool` call proceed.
    pub fn open(&self) {
        self.gate.open();
    }

    /// The engine calls are delegated to once the gate opens.
    pub fn inner(&self) -> &MockEngine {
        &self.inner
    }

    /// Number of `create_pool` calls that ran to completion.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl MemoryEngine for GatedEngine {
    fn create_pool(&self, total_memory: u64) -> Result<PoolHandle, EngineError> {
        self.gate.wait(Duration::from_secs(30));
        let pool = self.inner.create_pool(total_memory);
        self.completed.fetch_add(1, Ordering::SeqCst);
        pool
    }
}

/// One-shot open/closed latch.
struct Gate {
    open: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    fn new() -> Self {
        Self {
            open: Mutex::new(false),
            cv: Condvar::new(),
        }
    }

    fn open(&self) {
        *self.open.lock().unwrap() = true;
        self.cv.notify_all();
    }

    fn wait(&self, limit: Duration) {
        let guard = self.open.lock().unwrap();
        let _ = self.cv.wait_timeout_while(guard, limit, |open| !*open).unwrap();
    }
}

fn entry(spec: &BlockClassSpec) -> Value {
    json!({"block_size": spec.size, "block_count": spec.count})
}

/// `{"<tier>": {"block_size", "block_count"}, ..}` for `classes`.
pub fn mapping_report(classes: &[BlockClassSpec]) -> Value {
    let map: Map<String, Value> = classes
        .iter()
        .enumerate()
        .map(|(i, spec)| (format!("{}_{i}", spec.tier), entry(spec)))
        .collect();
    Value::Object(map)
}

/// `[{"block_size", "block_count"}, ..]` for `classes`.
pub fn sequence_report(classes: &[BlockClassSpec]) -> Value {
    Value::Array(classes.iter().map(entry).collect())
}
