//! Tracker tuning.

use std::time::Duration;

/// Distance at which a treasure counts as found (meters).
pub const DEFAULT_FIND_RADIUS_M: f64 = 1.0;

/// Distance under which the hunter is told they are getting warmer (meters).
pub const DEFAULT_WARM_RADIUS_M: f64 = 30.0;

/// Minimum time between two evaluation passes.
pub const DEFAULT_DEBOUNCE_INTERVAL: Duration = Duration::from_millis(200);

/// Configuration for the proximity tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Find radius in meters (inclusive).
    pub find_radius_m: f64,
    /// "Getting warmer" radius in meters (inclusive).
    pub warm_radius_m: f64,
    /// Fixes arriving sooner than this after the last evaluation are ignored.
    pub debounce_interval: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            find_radius_m: DEFAULT_FIND_RADIUS_M,
            warm_radius_m: DEFAULT_WARM_RADIUS_M,
            debounce_interval: DEFAULT_DEBOUNCE_INTERVAL,
        }
    }
}

impl TrackerConfig {
    /// Set the find radius.
    pub fn with_find_radius(mut self, meters: f64) -> Self {
        self.find_radius_m = meters;
        self
    }

    /// Set the warm radius.
    pub fn with_warm_radius(mut self, meters: f64) -> Self {
        self.warm_radius_m = meters;
        self
    }

    /// Set the debounce interval.
    pub fn with_debounce_interval(mut self, interval: Duration) -> Self {
        self.debounce_interval = interval;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.find_radius_m, 1.0);
        assert_eq!(config.warm_radius_m, 30.0);
        assert_eq!(config.debounce_interval, Duration::from_millis(200));
    }

    #[test]
    fn test_builder() {
        let config = TrackerConfig::default()
            .with_find_radius(5.0)
            .with_warm_radius(50.0)
            .with_debounce_interval(Duration::ZERO);

        assert_eq!(config.find_radius_m, 5.0);
        assert_eq!(config.warm_radius_m, 50.0);
        assert_eq!(config.debounce_interval, Duration::ZERO);
    }
}
