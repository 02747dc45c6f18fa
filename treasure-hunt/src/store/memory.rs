//! In-memory treasure store.

use parking_lot::Mutex;

use super::model::Treasure;
use super::traits::{append_to, mark_found_in, StoreError, StoreResult, TreasureStore};

/// Treasure store backed by a `Vec` behind a mutex.
///
/// Used as the test fake for the tracker and for hunts that should not touch
/// disk. `fail_writes` makes every mutating call fail, for exercising the
/// tracker's non-fatal collaborator error path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Treasure>>,
    fail_writes: bool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with the given records.
    pub fn with_treasures(treasures: impl IntoIterator<Item = Treasure>) -> Self {
        Self {
            records: Mutex::new(treasures.into_iter().collect()),
            fail_writes: false,
        }
    }

    /// Make every write fail with [`StoreError::Unavailable`].
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

impl TreasureStore for MemoryStore {
    fn load_unfound(&self) -> StoreResult<Vec<Treasure>> {
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|t| !t.found)
            .cloned()
            .collect())
    }

    fn mark_found(&self, id: &str) -> StoreResult<()> {
        self.check_writable()?;
        mark_found_in(&mut self.records.lock(), id)
    }

    fn load_all(&self) -> StoreResult<Vec<Treasure>> {
        Ok(self.records.lock().clone())
    }

    fn append(&self, treasure: Treasure) -> StoreResult<()> {
        self.check_writable()?;
        append_to(&mut self.records.lock(), treasure)
    }

    fn clear(&self) -> StoreResult<()> {
        self.check_writable()?;
        self.records.lock().clear();
        Ok(())
    }
}
