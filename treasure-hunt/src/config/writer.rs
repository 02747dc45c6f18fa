//! INI serialization for `ConfigFile`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"; Treasure Hunt configuration

[hunt]
; Distance in meters at which a treasure counts as found (default: 1.0)
find_radius = {}
; Distance in meters at which the "Getting warmer!" hint appears (default: 30.0)
warm_radius = {}
; Minimum milliseconds between evaluated location fixes (default: 200)
debounce_ms = {}

[store]
; JSON document holding placed treasures
path = {}

[logging]
; Directory for log files
directory = {}
"#,
        config.hunt.find_radius,
        config.hunt.warm_radius,
        config.hunt.debounce_ms,
        path_to_string(&config.store.path),
        path_to_string(&config.logging.directory),
    )
}

/// Convert path to string, collapsing home dir to ~.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
