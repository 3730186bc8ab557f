//! Configuration file
//!
//! Optional JSON file; every field has a default:
//!
//! ```json
//! {
//!   "data_file": "inventory.txt",
//!   "persistence": "file",
//!   "fsync": true
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event};
use crate::store::{PersistenceMode, StoreConfig, DEFAULT_DATA_FILE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON in '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Backing file path
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// "file" or "memory"
    #[serde(default)]
    pub persistence: PersistenceMode,

    /// fsync temp file and directory on save
    #[serde(default = "default_fsync")]
    pub fsync: bool,
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}
fn default_fsync() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            persistence: PersistenceMode::default(),
            fsync: default_fsync(),
        }
    }
}

impl Config {
    /// Load and validate a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&content).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("path", &path.display().to_string()),
                ("data_file", &config.data_file),
                ("persistence", config.persistence.as_str()),
            ],
        );

        Ok(config)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.data_file.trim().is_empty() {
            return Err(ConfigError::Invalid("data_file must not be empty".into()));
        }
        Ok(())
    }

    /// Convert into the store's configuration.
    pub fn to_store_config(&self) -> StoreConfig {
        StoreConfig {
            path: PathBuf::from(&self.data_file),
            mode: self.persistence,
            fsync: self.fsync,
        }
    }
}
