//! Application configuration
//!
//! Read from `<config_dir>/bizlingo/config.toml` when present:
//! ```toml
//! data_dir = "/home/me/.local/share/bizlingo"
//! topics = ["Supply Chain", "FinTech"]
//! topic_match = "legacy"
//!
//! [provider]
//! api_key = "..."
//! model = "gemini-3-flash-preview"
//! timeout_secs = 60
//! ```
//! The API key and data directory can also come from the environment.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::daily::TopicMatchPolicy;
use crate::storage::FileStore;
use crate::vocab::seed::default_topics;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Checked in order; the first one set wins
pub const API_KEY_ENV_VARS: &[&str] = &["BIZLINGO_API_KEY", "GEMINI_API_KEY", "API_KEY"];
pub const DATA_DIR_ENV_VAR: &str = "BIZLINGO_DATA_DIR";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Config directory not found")]
    ConfigDirNotFound,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings for the hosted generative model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Pool the daily topic is drawn from
    pub topics: Vec<String>,
    pub topic_match: TopicMatchPolicy,
    pub provider: ProviderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            topics: default_topics(),
            topic_match: TopicMatchPolicy::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("bizlingo").join("config.toml"))
            .ok_or(ConfigError::ConfigDirNotFound)
    }

    /// Parse a config file. A missing file gives the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        log::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load from `path` (or the default location) and apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::from_file(&Self::default_path()?)?,
        };
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let env_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.trim().is_empty());
        if let Some(key) = env_key {
            self.provider.api_key = Some(key);
        }

        if let Some(dir) = lookup(DATA_DIR_ENV_VAR).filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }

        if self.topics.is_empty() {
            self.topics = default_topics();
        }
    }

    /// Directory the persisted documents live in
    pub fn resolve_data_dir(&self) -> std::result::Result<PathBuf, crate::storage::StorageError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => FileStore::default_data_dir(),
        }
    }
}
