//! The treasure store contract.
//!
//! The proximity tracker never touches persistence directly. It calls through
//! [`TreasureStore`] and treats every [`StoreError`] as non-fatal: the error is
//! logged and tracking continues on the in-memory copy it already holds.

use thiserror::Error;

use super::model::Treasure;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a treasure store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O error reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A treasure with this id already exists.
    #[error("A treasure named '{0}' already exists")]
    DuplicateId(String),

    /// No treasure with this id exists.
    #[error("No treasure named '{0}'")]
    UnknownId(String),

    /// The store (or its background worker) is no longer accepting requests.
    #[error("Treasure store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence collaborator for treasures.
///
/// Implementations hold a single list of records. Order is insertion order
/// and must be preserved by every operation.
///
/// # Implementors
///
/// - `MemoryStore` - In-memory store for tests and ephemeral sessions
/// - `JsonFileStore` - Key-value JSON document on disk
/// - `BackgroundStore` - Fire-and-forget wrapper around another store
pub trait TreasureStore: Send + Sync {
    /// Load every treasure not yet found, in insertion order.
    fn load_unfound(&self) -> StoreResult<Vec<Treasure>>;

    /// Flip the `found` flag of the treasure with the given id.
    fn mark_found(&self, id: &str) -> StoreResult<()>;

    /// Load every treasure, found or not.
    fn load_all(&self) -> StoreResult<Vec<Treasure>>;

    /// Append a new treasure. Fails with [`StoreError::DuplicateId`] if the id
    /// is taken.
    fn append(&self, treasure: Treasure) -> StoreResult<()>;

    /// Remove every treasure.
    fn clear(&self) -> StoreResult<()>;
}

/// Apply a mark-found to an in-memory record list.
pub(super) fn mark_found_in(records: &mut [Treasure], id: &str) -> StoreResult<()> {
    let record = records
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| StoreError::UnknownId(id.to_string()))?;
    record.found = true;
    Ok(())
}

/// Append to an in-memory record list, rejecting duplicate ids.
pub(super) fn append_to(records: &mut Vec<Treasure>, treasure: Treasure) -> StoreResult<()> {
    if records.iter().any(|t| t.id == treasure.id) {
        return Err(StoreError::DuplicateId(treasure.id));
    }
    records.push(treasure);
    Ok(())
}
