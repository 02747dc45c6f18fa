//! Messages exchanged with a running hunt session.

use crate::store::Treasure;
use crate::tracker::ProximityHint;

/// Commands sent from the UI to a hunt session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntCommand {
    /// Dismiss the found treasure and keep hunting.
    Acknowledge,
    /// Re-seed the hunt from the store.
    Reload,
    /// Clear all tracker state.
    Reset,
    /// End the session.
    Shutdown,
}

/// Events broadcast by a hunt session for UI consumption.
#[derive(Debug, Clone, PartialEq)]
pub enum HuntEvent {
    /// The session (re)loaded its treasures.
    Started { remaining: usize },
    /// A fix was evaluated and no treasure is in range.
    Distance {
        meters: f64,
        hint: ProximityHint,
        remaining: usize,
    },
    /// A treasure entered the find radius.
    Found { treasure: Treasure, distance: f64 },
    /// The store failed; the hunt continues on its in-memory copy.
    StoreFailed {
        treasure: Option<String>,
        error: String,
    },
    /// The found treasure was dismissed.
    Acknowledged {
        treasure: Treasure,
        remaining: usize,
    },
    /// Every treasure in this session has been found.
    Exhausted,
    /// A malformed fix was ignored.
    FixRejected { reason: String },
    /// The session ended.
    Stopped,
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HuntSummary {
    /// Fixes delivered to the session.
    pub fixes_received: usize,
    /// Fixes that ran an evaluation pass.
    pub fixes_evaluated: usize,
    /// Malformed fixes.
    pub fixes_rejected: usize,
    /// Ids of treasures found, in order.
    pub found: Vec<String>,
}
