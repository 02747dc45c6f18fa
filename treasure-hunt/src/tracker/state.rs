//! Tracker states, hints and per-update outcomes.

use std::fmt;

use thiserror::Error;

use crate::location::FixError;
use crate::store::Treasure;

/// Phase of a hunt session.
///
/// ```text
///            initialize(non-empty)           fix within find radius
///    Idle -------------------------> Hunting ----------------------> Found
///     ^                               ^  |                             |
///     |          acknowledge_found    |  | initialize (re-seed)        |
///     |          (treasures remain)   |  +-----------------------------+
///     +-------------------------------+-------------------------------+
///              acknowledge_found (none remain) / reset
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HuntPhase {
    /// No treasures loaded; fixes are ignored.
    Idle,
    /// Treasures loaded, none found yet; fixes are evaluated.
    Hunting,
    /// A treasure was found; fixes are ignored until acknowledged.
    Found,
}

impl HuntPhase {
    /// Short description for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            HuntPhase::Idle => "Idle",
            HuntPhase::Hunting => "Hunting",
            HuntPhase::Found => "Found",
        }
    }

    /// Check if fixes are currently evaluated.
    pub fn is_hunting(&self) -> bool {
        matches!(self, HuntPhase::Hunting)
    }
}

impl fmt::Display for HuntPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How close the hunter is to the nearest treasure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProximityHint {
    /// Within the find radius.
    VeryClose,
    /// Within the warm radius.
    Warmer,
    /// Further away.
    Cold,
}

impl ProximityHint {
    /// Classify a distance against the find and warm radii.
    pub fn from_distance(meters: f64, find_radius_m: f64, warm_radius_m: f64) -> Self {
        if meters <= find_radius_m {
            ProximityHint::VeryClose
        } else if meters <= warm_radius_m {
            ProximityHint::Warmer
        } else {
            ProximityHint::Cold
        }
    }

    /// Message shown to the hunter.
    pub fn message(&self) -> &'static str {
        match self {
            ProximityHint::VeryClose => "Very close!",
            ProximityHint::Warmer => "Getting warmer!",
            ProximityHint::Cold => "Keep searching",
        }
    }
}

impl fmt::Display for ProximityHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// What a single location update did.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The fix was malformed and ignored.
    Rejected(FixError),
    /// No treasures are loaded.
    Idle,
    /// A found treasure awaits acknowledgment.
    Paused,
    /// The fix arrived inside the debounce window.
    Debounced,
    /// Distances were evaluated; nothing within the find radius.
    Evaluated {
        /// Minimum distance to any active treasure (meters).
        nearest_distance: f64,
    },
    /// A treasure entered the find radius.
    Found {
        treasure: Treasure,
        /// Distance to the found treasure (meters).
        distance: f64,
        /// Whether the store accepted the mark-found request.
        persisted: bool,
    },
}

impl UpdateOutcome {
    /// Check if this update ran an evaluation pass.
    pub fn was_evaluated(&self) -> bool {
        matches!(
            self,
            UpdateOutcome::Evaluated { .. } | UpdateOutcome::Found { .. }
        )
    }

    /// The found treasure, if this update found one.
    pub fn found(&self) -> Option<&Treasure> {
        match self {
            UpdateOutcome::Found { treasure, .. } => Some(treasure),
            _ => None,
        }
    }
}

/// Tracker operations called in the wrong phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
    /// `acknowledge_found` was called with no found treasure pending.
    #[error("No found treasure to acknowledge")]
    NothingFound,
}
