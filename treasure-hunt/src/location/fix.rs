//! Location fix types.
//!
//! A location provider delivers [`RawFix`] values whose coordinates may be
//! missing; the tracker only ever evaluates validated [`LocationFix`] values.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{CoordError, Coordinate};

/// Errors for fixes that cannot be evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FixError {
    /// The provider delivered a fix without a latitude.
    #[error("Fix is missing latitude")]
    MissingLatitude,

    /// The provider delivered a fix without a longitude.
    #[error("Fix is missing longitude")]
    MissingLongitude,

    /// Coordinates were present but invalid.
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordError),

    /// Accuracy was negative or not finite.
    #[error("Invalid accuracy: {0}m")]
    InvalidAccuracy(f64),

    /// The raw fix could not be decoded at all.
    #[error("Failed to parse fix: {0}")]
    Parse(String),
}

/// A fix as delivered by a location provider, before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawFix {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Horizontal accuracy radius in meters, if the provider reports one.
    #[serde(default)]
    pub accuracy: Option<f64>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp_ms: Option<i64>,
}

impl RawFix {
    /// Create a raw fix with both coordinates present.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Default::default()
        }
    }
}

/// A validated GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationFix {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Horizontal accuracy in meters (optional).
    pub accuracy: Option<f64>,
    /// Milliseconds since the Unix epoch.
    pub timestamp_ms: i64,
}

impl LocationFix {
    /// Create a fix stamped with the current wall-clock time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Create a fix with an explicit timestamp.
    pub fn at(latitude: f64, longitude: f64, timestamp_ms: i64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp_ms,
        }
    }

    /// Set the horizontal accuracy.
    pub fn with_accuracy(mut self, meters: f64) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// The fix position as a validated coordinate.
    pub fn coordinate(&self) -> Result<Coordinate, CoordError> {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Check coordinates and accuracy.
    pub fn validate(&self) -> Result<(), FixError> {
        self.coordinate()?;

        if let Some(accuracy) = self.accuracy {
            if !accuracy.is_finite() || accuracy < 0.0 {
                return Err(FixError::InvalidAccuracy(accuracy));
            }
        }
        Ok(())
    }
}

impl TryFrom<RawFix> for LocationFix {
    type Error = FixError;

    fn try_from(raw: RawFix) -> Result<Self, Self::Error> {
        let latitude = raw.latitude.ok_or(FixError::MissingLatitude)?;
        let longitude = raw.longitude.ok_or(FixError::MissingLongitude)?;

        let fix = Self {
            latitude,
            longitude,
            accuracy: raw.accuracy,
            timestamp_ms: raw
                .timestamp_ms
                .unwrap_or_else(|| chrono::Utc::now().timestamp_millis()),
        };
        fix.validate()?;
        Ok(fix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_fix_converts() {
        let raw = RawFix {
            latitude: Some(37.7749),
            longitude: Some(-122.4194),
            accuracy: Some(4.5),
            timestamp_ms: Some(1_700_000_000_000),
        };

        let fix = LocationFix::try_from(raw).unwrap();
        assert_eq!(fix.latitude, 37.7749);
        assert_eq!(fix.longitude, -122.4194);
        assert_eq!(fix.accuracy, Some(4.5));
        assert_eq!(fix.timestamp_ms, 1_700_000_000_000);
    }

    #[test]
    fn test_missing_coordinates_rejected() {
        let raw = RawFix {
            longitude: Some(1.0),
            ..Default::default()
        };
        assert_eq!(
            LocationFix::try_from(raw),
            Err(FixError::MissingLatitude)
        );

        let raw = RawFix {
            latitude: Some(1.0),
            ..Default::default()
        };
        assert_eq!(
            LocationFix::try_from(raw),
            Err(FixError::MissingLongitude)
        );
    }

    #[test]
    fn test_out_of_range_rejected() {
        let result = LocationFix::try_from(RawFix::new(91.0, 0.0));
        assert!(matches!(
            result,
            Err(FixError::InvalidCoordinate(CoordError::InvalidLatitude(_)))
        ));
    }

    #[test]
    fn test_negative_accuracy_rejected() {
        let raw = RawFix {
            accuracy: Some(-1.0),
            ..RawFix::new(0.0, 0.0)
        };
        assert_eq!(
            LocationFix::try_from(raw),
            Err(FixError::InvalidAccuracy(-1.0))
        );
    }

    #[test]
    fn test_validate_checks_accuracy() {
        assert!(LocationFix::at(0.0, 0.0, 0).with_accuracy(4.0).validate().is_ok());
        assert!(matches!(
            LocationFix::at(0.0, 0.0, 0).with_accuracy(f64::NAN).validate(),
            Err(FixError::InvalidAccuracy(_))
        ));
        assert!(matches!(
            LocationFix::at(0.0, 200.0, 0).validate(),
            Err(FixError::InvalidCoordinate(_))
        ));
    }

    #[test]
    fn test_missing_timestamp_is_stamped() {
        let before = chrono::Utc::now().timestamp_millis();
        let fix = LocationFix::try_from(RawFix::new(0.0, 0.0)).unwrap();
        assert!(fix.timestamp_ms >= before);
        assert!(fix.accuracy.is_none());
    }

    #[test]
    fn test_raw_fix_deserializes_with_missing_fields() {
        let raw: RawFix = serde_json::from_str(r#"{"latitude": 1.5}"#).unwrap();
        assert_eq!(raw.latitude, Some(1.5));
        assert!(raw.longitude.is_none());
        assert!(raw.accuracy.is_none());
    }
}
