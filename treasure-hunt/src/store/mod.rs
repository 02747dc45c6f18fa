//! Treasure persistence.
//!
//! The proximity engine depends only on the [`TreasureStore`] trait. This
//! module also provides the stores the CLI and tests plug in:
//!
//! - [`MemoryStore`] - in-memory fake
//! - [`JsonFileStore`] - the list of records under a fixed key in a JSON document
//! - [`BackgroundStore`] - fire-and-forget `mark_found` on a worker task

mod background;
mod file;
mod memory;
mod model;
mod traits;

pub use background::{BackgroundStore, PersistFailure};
pub use file::{JsonFileStore, TREASURES_KEY};
pub use memory::MemoryStore;
pub use model::Treasure;
pub use traits::{StoreError, StoreResult, TreasureStore};
