//! # Configuration
//!
//! Where history is stored, with a clear override hierarchy:
//! defaults → `reckon.toml` → environment variables.
//!
//! ```toml
//! storage_key = "calculator_history"
//! data_dir = "/var/lib/reckon"
//! ```

use crate::store::{FileStore, StoreEnv, HISTORY_STORAGE_KEY};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "reckon.toml";
pub const ENV_DATA_DIR: &str = "RECKON_DATA_DIR";
pub const ENV_STORAGE_KEY: &str = "RECKON_STORAGE_KEY";

const APP_DIR_NAME: &str = "reckon";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Engine settings. Every field is optional in the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Key the history list is stored under
    pub storage_key: String,
    /// Directory holding the history file; platform data dir when unset
    pub data_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage_key: HISTORY_STORAGE_KEY.to_string(),
            data_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                info!("Loaded config from {}", path.display());
                Self::from_toml_str(&contents)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Load `<config dir>/reckon/reckon.toml`, then apply environment overrides.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config = match dirs::config_dir() {
            Some(dir) => Self::load(&dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))?,
            None => Self::default(),
        };
        Ok(config.apply_env())
    }

    /// Apply `RECKON_DATA_DIR` and `RECKON_STORAGE_KEY` if set.
    pub fn apply_env(self) -> Self {
        self.with_overrides(
            std::env::var(ENV_DATA_DIR).ok(),
            std::env::var(ENV_STORAGE_KEY).ok(),
        )
    }

    fn with_overrides(mut self, data_dir: Option<String>, storage_key: Option<String>) -> Self {
        if let Some(dir) = data_dir.filter(|d| !d.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = storage_key.filter(|k| !k.trim().is_empty()) {
            self.storage_key = key;
        }
        self
    }

    /// Directory the history file lives in.
    ///
    /// Falls back to `<data dir>/reckon`, or `./.reckon` when the platform
    /// has no data directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.clone(),
            None => dirs::data_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .unwrap_or_else(|| PathBuf::from(".reckon")),
        }
    }

    /// File-backed store environment for this configuration.
    pub fn open_store(&self) -> StoreEnv {
        let dir = self.resolved_data_dir();
        debug!("History store at {}", dir.display());
        StoreEnv::new(Arc::new(FileStore::new(dir))).with_key(self.storage_key.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn defaults_use_standard_key() {
        let config = EngineConfig::default();
        assert_eq!(config.storage_key, "calculator_history");
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn sparse_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str("data_dir = \"/tmp/calc\"").unwrap();
        assert_eq!(config.storage_key, HISTORY_STORAGE_KEY);
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/calc")));
        assert_eq!(config.resolved_data_dir(), PathBuf::from("/tmp/calc"));
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let result = EngineConfig::from_toml_str("storage_key = [");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_default() {
        let path = std::env::temp_dir().join(format!("reckon-missing-{}.toml", Uuid::new_v4()));
        assert_eq!(EngineConfig::load(&path).unwrap(), EngineConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join(format!("reckon-config-{}.toml", Uuid::new_v4()));
        fs::write(&path, "storage_key = \"work_history\"\n").unwrap();

        let config = EngineConfig::load(&path).unwrap();
        assert_eq!(config.storage_key, "work_history");

        fs::remove_file(path).unwrap();
    }

    #[test]
    fn overrides_win_over_file_values() {
        let config = EngineConfig::from_toml_str("storage_key = \"a\"")
            .unwrap()
            .with_overrides(Some("/srv/reckon".to_string()), Some("b".to_string()));

        assert_eq!(config.storage_key, "b");
        assert_eq!(config.data_dir, Some(PathBuf::from("/srv/reckon")));
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let config = EngineConfig::default().with_overrides(Some(" ".to_string()), Some(String::new()));
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn open_store_uses_configured_key() {
        let config = EngineConfig {
            storage_key: "scratch".to_string(),
            data_dir: Some(PathBuf::from("/tmp/reckon-unused")),
        };
        assert_eq!(config.open_store().key(), "scratch");
    }
}
