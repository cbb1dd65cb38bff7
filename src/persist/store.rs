//! Durable key-value stores backing the persisted record

use crate::error::{TaskdeckError, TaskdeckResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tokio::fs;
use tracing::debug;

/// Asynchronous string key-value storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if nothing was ever written
    async fn get(&self, key: &str) -> TaskdeckResult<Option<String>>;

    /// Replace the value under `key`
    async fn set(&self, key: &str, value: &str) -> TaskdeckResult<()>;

    /// Remove the value under `key` (missing keys are not an error)
    async fn remove(&self, key: &str) -> TaskdeckResult<()>;

    /// Human-readable location of `key`, for status output
    fn describe(&self, key: &str) -> String;
}

/// One JSON file per key inside a private directory
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub async fn open(dir: impl Into<PathBuf>) -> TaskdeckResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| TaskdeckError::io(format!("creating store dir {}", dir.display()), e))?;

        // The record holds a bearer token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            std::fs::set_permissions(&dir, perms)
                .map_err(|e| TaskdeckError::io("setting store dir permissions", e))?;
        }

        Ok(Self { dir })
    }

    /// Directory the store writes into
    #[cfg(test)]
    pub(crate) fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    /// Keys are file stems; anything that would leave `dir` is refused
    fn key_path(&self, key: &str) -> TaskdeckResult<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(TaskdeckError::Persist(format!("invalid store key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> TaskdeckResult<Option<String>> {
        let path = self.key_path(key)?;

        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| TaskdeckError::io(format!("reading store file {}", path.display()), e))?;

        Ok(Some(content))
    }

    async fn set(&self, key: &str, value: &str) -> TaskdeckResult<()> {
        let path = self.key_path(key)?;
        let tmp = self.dir.join(format!(".{}.json.tmp", key));

        fs::write(&tmp, value)
            .await
            .map_err(|e| TaskdeckError::io(format!("writing store file {}", tmp.display()), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&tmp, perms)
                .map_err(|e| TaskdeckError::io("setting store file permissions", e))?;
        }

        fs::rename(&tmp, &path)
            .await
            .map_err(|e| TaskdeckError::io(format!("replacing store file {}", path.display()), e))?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove(&self, key: &str) -> TaskdeckResult<()> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(&path).await.map_err(|e| {
                TaskdeckError::io(format!("removing store file {}", path.display()), e)
            })?;
        }
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        match self.key_path(key) {
            Ok(path) => path.display().to_string(),
            Err(_) => format!("{} (invalid key '{}')", self.dir.display(), key),
        }
    }
}

/// Process-local store, used when nothing should touch the disk
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> TaskdeckResult<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> TaskdeckResult<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> TaskdeckResult<()> {
        self.values().remove(key);
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        format!("memory:{}", key)
    }
}
