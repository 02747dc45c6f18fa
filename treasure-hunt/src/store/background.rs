//! Fire-and-forget persistence.
//!
//! [`BackgroundStore`] wraps another store so that `mark_found` returns as
//! soon as the request is queued. A worker task applies queued requests in
//! order on the blocking pool, so the tracker never waits on disk I/O.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::model::Treasure;
use super::traits::{StoreError, StoreResult, TreasureStore};

/// A mark-found request that the worker could not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistFailure {
    /// Treasure id that was being marked.
    pub id: String,
    /// Error message from the wrapped store.
    pub error: String,
}

/// Store wrapper that applies `mark_found` asynchronously.
///
/// Reads, appends and clears pass straight through to the wrapped store.
pub struct BackgroundStore {
    inner: Arc<dyn TreasureStore>,
    tx: mpsc::UnboundedSender<String>,
}

impl BackgroundStore {
    /// Spawn the worker on the current Tokio runtime.
    ///
    /// Failures are logged and, if `failures` is given, reported on it. The
    /// worker exits once every `BackgroundStore` handle is dropped and the
    /// queue is drained.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn(
        inner: Arc<dyn TreasureStore>,
        failures: Option<mpsc::UnboundedSender<PersistFailure>>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_worker(Arc::clone(&inner), rx, failures));
        (Self { inner, tx }, handle)
    }
}

async fn run_worker(
    inner: Arc<dyn TreasureStore>,
    mut rx: mpsc::UnboundedReceiver<String>,
    failures: Option<mpsc::UnboundedSender<PersistFailure>>,
) {
    while let Some(id) = rx.recv().await {
        let store = Arc::clone(&inner);
        let task_id = id.clone();
        let result = tokio::task::spawn_blocking(move || store.mark_found(&task_id)).await;

        let error = match result {
            Ok(Ok(())) => continue,
            Ok(Err(e)) => e.to_string(),
            Err(join_err) => format!("persistence task failed: {}", join_err),
        };

        tracing::warn!(treasure = %id, error = %error, "Failed to persist found treasure");
        if let Some(tx) = &failures {
            let _ = tx.send(PersistFailure { id, error });
        }
    }

    tracing::debug!("Background store worker exiting");
}

impl TreasureStore for BackgroundStore {
    fn load_unfound(&self) -> StoreResult<Vec<Treasure>> {
        self.inner.load_unfound()
    }

    fn mark_found(&self, id: &str) -> StoreResult<()> {
        self.tx
            .send(id.to_string())
            .map_err(|_| StoreError::Unavailable("background worker stopped".to_string()))
    }

    fn load_all(&self) -> StoreResult<Vec<Treasure>> {
        self.inner.load_all()
    }

    fn append(&self, treasure: Treasure) -> StoreResult<()> {
        self.inner.append(treasure)
    }

    fn clear(&self) -> StoreResult<()> {
        self.inner.clear()
    }
}

impl std::fmt::Debug for BackgroundStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundStore")
            .field("worker_alive", &!self.tx.is_closed())
            .finish()
    }
}
