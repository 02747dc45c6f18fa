//! Settings structs and defaults for each `[section]` of config.ini.

use std::path::PathBuf;
use std::time::Duration;

use crate::tracker::{
    TrackerConfig, DEFAULT_DEBOUNCE_INTERVAL, DEFAULT_FIND_RADIUS_M, DEFAULT_WARM_RADIUS_M,
};

/// Default treasure store filename inside the config directory.
pub const DEFAULT_STORE_FILE: &str = "treasures.json";

/// Default log directory name inside the config directory.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Hunt tuning
    pub hunt: HuntSettings,
    /// Treasure store settings
    pub store: StoreSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// `[hunt]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct HuntSettings {
    /// Find radius in meters
    pub find_radius: f64,
    /// "Getting warmer" radius in meters
    pub warm_radius: f64,
    /// Minimum milliseconds between evaluated fixes
    pub debounce_ms: u64,
}

/// `[store]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSettings {
    /// Path of the JSON treasure document
    pub path: PathBuf,
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Directory for log files
    pub directory: PathBuf,
}

impl Default for HuntSettings {
    fn default() -> Self {
        Self {
            find_radius: DEFAULT_FIND_RADIUS_M,
            warm_radius: DEFAULT_WARM_RADIUS_M,
            debounce_ms: DEFAULT_DEBOUNCE_INTERVAL.as_millis() as u64,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let dir = super::file::config_directory();
        Self {
            hunt: HuntSettings::default(),
            store: StoreSettings {
                path: dir.join(DEFAULT_STORE_FILE),
            },
            logging: LoggingSettings {
                directory: dir.join(DEFAULT_LOG_DIR),
            },
        }
    }
}

impl ConfigFile {
    /// Tracker configuration derived from the `[hunt]` section.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig::default()
            .with_find_radius(self.hunt.find_radius)
            .with_warm_radius(self.hunt.warm_radius)
            .with_debounce_interval(Duration::from_millis(self.hunt.debounce_ms))
    }
}
