//! Configuration loading and management
//!
//! Handles parsing of `taskflow.toml` and resolving the data directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::state::{DuplicateIds, StateOptions};
use crate::store::DEFAULT_STORAGE_KEY;

/// File name looked up inside the data directory
pub const CONFIG_FILENAME: &str = "taskflow.toml";

/// Fallback data directory when the platform has none
pub const FALLBACK_DATA_DIR: &str = ".taskflow";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub todos: TodosConfig,
}

/// Where and how todos are persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Slot name the list is stored under
    #[serde(default = "default_key")]
    pub key: String,

    /// How long to wait for another process holding the slot lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_key(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// Todo list behavior
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodosConfig {
    #[serde(default)]
    pub duplicate_ids: DuplicateIds,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists; defaults when missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    pub fn state_options(&self) -> StateOptions {
        StateOptions {
            duplicate_ids: self.todos.duplicate_ids,
        }
    }

    fn validate(&self) -> Result<()> {
        let key = self.storage.key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig("storage.key cannot be empty".to_string()));
        }
        if key != self.storage.key {
            return Err(Error::InvalidConfig(
                "storage.key cannot have surrounding whitespace".to_string(),
            ));
        }
        if self.storage.lock_timeout_ms == 0 {
            return Err(Error::InvalidConfig(
                "storage.lock_timeout_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Data directory: explicit path, else the platform data dir, else `./.taskflow`
pub fn resolve_data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    directories::ProjectDirs::from("", "", "taskflow")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
}
