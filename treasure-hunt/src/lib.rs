//! Treasure Hunt - GPS proximity engine for location-based treasure hunts
//!
//! Treasures are hidden at GPS coordinates and stored in a JSON document.
//! A [`tracker::ProximityTracker`] consumes a stream of location fixes,
//! measures great-circle distance to every unfound treasure and reports a
//! find once the device comes within the find radius.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use treasure_hunt::location::LocationFix;
//! use treasure_hunt::store::{MemoryStore, Treasure};
//! use treasure_hunt::tracker::ProximityTracker;
//!
//! let store = Arc::new(MemoryStore::with_treasures(vec![
//!     Treasure::new("gold", 37.7749, -122.4194),
//! ]));
//! let mut tracker = ProximityTracker::new(store);
//! tracker.load_from_store().unwrap();
//!
//! let outcome = tracker.on_location_update(LocationFix::new(37.7749, -122.4194));
//! assert!(outcome.found().is_some());
//! ```

pub mod config;
pub mod geo;
pub mod location;
pub mod logging;
pub mod place;
pub mod session;
pub mod store;
pub mod tracker;

pub use geo::{distance, haversine_distance, Coordinate};
pub use place::{place_treasure, PlaceError};
pub use store::{Treasure, TreasureStore};
pub use tracker::ProximityTracker;
