//! Shared state resolved once per invocation.

use std::path::PathBuf;
use treasure_hunt::config::{config_file_path, ConfigFile};
use treasure_hunt::store::JsonFileStore;

use crate::error::CliError;

/// Loaded configuration plus any command-line overrides.
#[derive(Debug, Clone)]
pub struct Context {
    /// Path the configuration was loaded from.
    pub config_path: PathBuf,
    /// Effective configuration.
    pub config: ConfigFile,
}

impl Context {
    /// Load configuration from `config_path` (or the default location) and
    /// apply a store path override.
    pub fn load(
        config_path: Option<PathBuf>,
        store_override: Option<PathBuf>,
    ) -> Result<Self, CliError> {
        let config_path = config_path.unwrap_or_else(config_file_path);
        let mut config = ConfigFile::load_from(&config_path)?;

        // CLI takes precedence over config
        if let Some(path) = store_override {
            config.store.path = path;
        }

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Open the configured treasure store.
    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::new(&self.config.store.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_override_wins() {
        let temp = tempfile::TempDir::new().unwrap();
        let config_path = temp.path().join("config.ini");
        std::fs::write(&config_path, "[store]\npath = /from/config.json\n").unwrap();

        let ctx = Context::load(
            Some(config_path.clone()),
            Some(temp.path().join("override.json")),
        )
        .unwrap();

        assert_eq!(ctx.config_path, config_path);
        assert_eq!(ctx.open_store().path(), temp.path().join("override.json"));
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let temp = tempfile::TempDir::new().unwrap();
        let ctx = Context::load(Some(temp.path().join("none.ini")), None).unwrap();
        assert_eq!(ctx.config.hunt, ConfigFile::default().hunt);
    }
}
