//! Configuration file handling
//!
//! Settings come from a TOML file. Every field has a default, so a missing
//! file or an empty one is a valid configuration.
//!
//! ```toml
//! data_dir = "/home/me/.local/share/mind-backlog"
//! storage_key = "currtenProblemItems"
//! step_policy = "advance_on_append"   # or "manual_toggle"
//! background_writes = false
//! ```

use crate::problem::StepPolicy;
use crate::storage::DEFAULT_STORAGE_KEY;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "mind-backlog";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the key-value files
    pub data_dir: PathBuf,
    /// Key the problem collection is stored under
    pub storage_key: String,
    /// What appending a step does to the previous step
    pub step_policy: StepPolicy,
    /// Write to disk from a background task instead of inline
    pub background_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            step_policy: StepPolicy::default(),
            background_writes: false,
        }
    }
}

/// `<data dir>/mind-backlog`, or `./.mind-backlog` when the platform has no data dir
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from(".mind-backlog"))
}

/// `<config dir>/mind-backlog/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Invalid configuration")?;
        Ok(config)
    }

    /// Load the configuration file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("In {}", path.display()))
    }

    /// Load `path` when given, otherwise the default config file if it exists
    ///
    /// An explicitly given path must exist; the default one may be missing.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_config_path() {
            Some(default_path) if default_path.exists() => Self::load(&default_path),
            _ => Ok(Self::default()),
        }
    }
}
