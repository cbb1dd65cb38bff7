//! Configuration schema for Taskdeck
//!
//! Configuration is stored at `~/.config/taskdeck/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Remote API settings
    pub api: ApiConfig,

    /// Durable storage settings
    pub storage: StorageConfig,

    /// Query cache settings
    pub cache: CacheConfig,
}

impl Config {
    /// Reject values that cannot be used as-is
    pub fn validate(&self) -> Result<(), String> {
        check_root_key(&self.storage.root_key)
    }
}

/// The root key names a file inside the store directory, so it must be a
/// plain file stem.
pub fn check_root_key(key: &str) -> Result<(), String> {
    if key.trim().is_empty() {
        return Err("storage.root_key cannot be empty".to_string());
    }
    if key.contains(['/', '\\']) || key.contains("..") {
        return Err(format!(
            "storage.root_key '{}' must not contain '/', '\\' or '..'",
            key
        ));
    }
    Ok(())
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,

    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            log_format: "text".to_string(),
        }
    }
}

/// Remote REST API settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,

    /// Overall request timeout; unset keeps the transport default
    pub timeout_secs: Option<u64>,
}

/// Durable key-value storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the persisted record lives under
    pub root_key: String,

    /// Directory holding the record (defaults to the state directory)
    pub dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_key: "root".to_string(),
            dir: None,
        }
    }
}

/// Query cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Write fulfilled query results alongside the session on exit
    pub persist: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { persist: true }
    }
}
