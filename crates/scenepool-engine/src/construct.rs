//! Timeout-bounded engine pool construction.
//!
//! The engine's `create_pool` is opaque and may block indefinitely, so it
//! runs on a dedicated worker thread that hands its result back through a
//! capacity-1 channel. The caller waits with a deadline; if it passes, the
//! worker is detached rather than cancelled and any late result is dropped
//! on the worker side when its send fails.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::RecvTimeoutError;
use scenepool_core::{EngineError, MemoryEngine, PoolHandle};

use crate::error::PoolError;

/// Build a pool of `total_memory` bytes, giving up after `timeout`.
pub fn create_pool_with_timeout(
    engine: &Arc<dyn MemoryEngine>,
    total_memory: u64,
    timeout: Duration,
) -> Result<PoolHandle, PoolError> {
    let (result_tx, result_rx) = crossbeam_channel::bounded(1);
    let worker_engine = Arc::clone(engine);

    // The JoinHandle is dropped on purpose: a stalled worker is abandoned.
    thread::Builder::new()
        .name("scenepool-construct".into())
        .spawn(move || {
            let result = worker_engine.create_pool(total_memory);
            // Fails only if the caller already timed out.
            let _ = result_tx.send(result);
        })
        .map_err(|e| PoolError::ThreadSpawnFailed {
            reason: format!("construction worker: {e}"),
        })?;

    match result_rx.recv_timeout(timeout) {
        Ok(Ok(pool)) => Ok(pool),
        Ok(Err(e)) => Err(PoolError::EngineConstruction(e)),
        Err(RecvTimeoutError::Timeout) => {
            tracing::error!(?timeout, total_memory, "memory pool creation timed out");
            Err(PoolError::CreationTimeout { timeout })
        }
        // Worker panicked before sending.
        Err(RecvTimeoutError::Disconnected) => Err(PoolError::EngineConstruction(
            EngineError::new("create_pool", "construction worker exited without a result"),
        )),
    }
}
