//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! Starts from `ConfigFile::default()` and overlays any values found.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [hunt] section
    if let Some(section) = ini.section(Some("hunt")) {
        if let Some(v) = section.get("find_radius") {
            config.hunt.find_radius = parse_radius("find_radius", v)?;
        }
        if let Some(v) = section.get("warm_radius") {
            config.hunt.warm_radius = parse_radius("warm_radius", v)?;
        }
        if let Some(v) = section.get("debounce_ms") {
            config.hunt.debounce_ms =
                v.trim()
                    .parse()
                    .map_err(|_| ConfigFileError::InvalidValue {
                        section: "hunt".to_string(),
                        key: "debounce_ms".to_string(),
                        value: v.to_string(),
                        reason: "must be a non-negative integer (milliseconds)".to_string(),
                    })?;
        }
    }

    if config.hunt.warm_radius < config.hunt.find_radius {
        tracing::warn!(
            find_radius = config.hunt.find_radius,
            warm_radius = config.hunt.warm_radius,
            "warm_radius is smaller than find_radius, 'Getting warmer' will never show"
        );
    }

    // [store] section
    if let Some(section) = ini.section(Some("store")) {
        if let Some(v) = section.get("path") {
            let v = v.trim();
            if !v.is_empty() {
                config.store.path = expand_tilde(v);
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_radius(key: &str, value: &str) -> Result<f64, ConfigFileError> {
    let invalid = || ConfigFileError::InvalidValue {
        section: "hunt".to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: "must be a positive number (meters)".to_string(),
    };

    let parsed: f64 = value.trim().parse().map_err(|_| invalid())?;
    if !parsed.is_finite() || parsed <= 0.0 {
        return Err(invalid());
    }
    Ok(parsed)
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
