//! Treasure proximity tracking.
//!
//! The [`ProximityTracker`] consumes location fixes and decides, for each one,
//! whether a treasure has been reached. It is a plain state machine with no
//! I/O of its own: persistence goes through [`crate::store::TreasureStore`] and
//! time comes from an injected [`Clock`].
//!
//! # Components
//!
//! - `clock` - `Clock` trait, `SystemClock`, `ManualClock` for tests
//! - `config` - `TrackerConfig` (find radius, warm radius, debounce)
//! - `state` - `HuntPhase`, `ProximityHint`, `UpdateOutcome`, `TrackerError`
//! - `tracker` - `ProximityTracker`

mod clock;
mod config;
mod state;
#[allow(clippy::module_inception)]
mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    TrackerConfig, DEFAULT_DEBOUNCE_INTERVAL, DEFAULT_FIND_RADIUS_M, DEFAULT_WARM_RADIUS_M,
};
pub use state::{HuntPhase, ProximityHint, TrackerError, UpdateOutcome};
pub use tracker::ProximityTracker;
