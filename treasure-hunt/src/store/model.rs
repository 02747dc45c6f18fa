//! Treasure record.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A hidden treasure.
///
/// The `id` is unique and doubles as the display name. Field names match the
/// persisted JSON record format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Treasure {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub found: bool,
}

impl Treasure {
    /// Create an unfound treasure.
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            found: false,
        }
    }

    /// Where this treasure is hidden.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new_unchecked(self.latitude, self.longitude)
    }
}

impl std::fmt::Display for Treasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\" at ({})", self.id, self.coordinate())
    }
}
