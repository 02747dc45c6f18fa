//! Geographic coordinate types and validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum valid latitude in degrees.
pub const MIN_LAT: f64 = -90.0;

/// Maximum valid latitude in degrees.
pub const MAX_LAT: f64 = 90.0;

/// Minimum valid longitude in degrees.
pub const MIN_LON: f64 = -180.0;

/// Maximum valid longitude in degrees.
pub const MAX_LON: f64 = 180.0;

/// Errors raised when a coordinate fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordError {
    /// Latitude outside [-90, 90] or not finite.
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    /// Longitude outside [-180, 180] or not finite.
    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinate {
    /// Create a validated coordinate.
    ///
    /// Rejects non-finite values and values outside the WGS84 ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        validate(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a coordinate without validation.
    ///
    /// Use only for values that are already known to be in range, e.g. records
    /// read back from the treasure store.
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check whether this coordinate is within the valid ranges.
    pub fn is_valid(&self) -> bool {
        validate(self.latitude, self.longitude).is_ok()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

/// Validate a latitude/longitude pair.
pub fn validate(latitude: f64, longitude: f64) -> Result<(), CoordError> {
    // NaN fails the range check, infinities fall outside it
    if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
        return Err(CoordError::InvalidLatitude(latitude));
    }
    if !(MIN_LON..=MAX_LON).contains(&longitude) {
        return Err(CoordError::InvalidLongitude(longitude));
    }
    Ok(())
}
