//! Configuration management for Taskdeck

pub mod schema;

pub use schema::{check_root_key, Config};

use crate::error::{TaskdeckError, TaskdeckResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Locates, reads and writes `config.toml`
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Manager for the per-user config file
    pub fn new() -> Self {
        Self::with_path(Self::default_config_path())
    }

    /// Manager for an explicit file (`--config` / `TASKDECK_CONFIG`)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// `<config dir>/taskdeck/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskdeck")
            .join("config.toml")
    }

    /// `<state dir>/taskdeck`, or the local data dir where no state dir exists
    pub fn state_dir() -> PathBuf {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskdeck")
    }

    /// Directory holding the persisted record for this configuration
    pub fn storage_dir(config: &Config) -> PathBuf {
        config
            .storage
            .dir
            .clone()
            .unwrap_or_else(Self::state_dir)
    }

    /// Read and validate the file; a missing file means all defaults
    pub async fn load(&self) -> TaskdeckResult<Config> {
        let path = &self.config_path;
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(path)
            .await
            .map_err(|e| TaskdeckError::io(format!("reading config from {}", path.display()), e))?;

        let invalid = |reason: String| TaskdeckError::ConfigInvalid {
            path: path.clone(),
            reason,
        };
        let config: Config = toml::from_str(&raw).map_err(|e| invalid(e.to_string()))?;
        config.validate().map_err(invalid)?;
        Ok(config)
    }

    /// Write `config`, creating the parent directory on first use
    pub async fn save(&self, config: &Config) -> TaskdeckResult<()> {
        let path = &self.config_path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| TaskdeckError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        fs::write(path, toml::to_string_pretty(config)?)
            .await
            .map_err(|e| TaskdeckError::io(format!("writing config to {}", path.display()), e))?;

        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply command-line and environment overrides on top of the file config
pub fn apply_overrides(config: &mut Config, base_url: Option<&str>) {
    if let Some(url) = base_url.map(str::trim).filter(|u| !u.is_empty()) {
        debug!("Using base URL override: {}", url);
        config.api.base_url = url.to_string();
    }
}
