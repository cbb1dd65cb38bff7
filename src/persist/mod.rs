//! Persistence of the session (and cache snapshot) across process restarts
//!
//! The whole client state lives in one JSON record under a fixed root key.
//! [`restore`] reads it once at start-up; a [`Persister`] owns a background
//! writer that coalesces rapid saves so only the latest value hits storage.
//!
//! | Call | Behavior |
//! |------|----------|
//! | `restore` | missing or corrupt record yields an empty state |
//! | `save_*` | fire-and-forget, last save wins |
//! | `flush` | writes anything pending, then stops the writer |

pub mod store;

pub use store::{FileStore, KeyValueStore, MemoryStore};

use crate::cache::CacheSnapshot;
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Everything that survives a restart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    /// Authentication state
    pub session: Session,

    /// Fulfilled query results, if cache persistence is enabled
    pub cache: Option<CacheSnapshot>,
}

/// Read the persisted record under `key`
///
/// Missing, unreadable, or corrupt data is treated as "no session".
pub async fn restore(store: &dyn KeyValueStore, key: &str) -> PersistedState {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No persisted state under {}", store.describe(key));
            return PersistedState::default();
        }
        Err(e) => {
            warn!("Failed to read persisted state, starting empty: {}", e);
            return PersistedState::default();
        }
    };

    match serde_json::from_str::<PersistedState>(&raw) {
        Ok(state) => {
            info!(
                "Restored state from {} (authenticated: {})",
                store.describe(key),
                state.session.token.is_some()
            );
            state
        }
        Err(e) => {
            warn!("Persisted state is corrupt, starting empty: {}", e);
            PersistedState::default()
        }
    }
}

struct Worker {
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Single owner of all writes to the persisted record
pub struct Persister {
    tx: watch::Sender<PersistedState>,
    worker: Mutex<Option<Worker>>,
    location: String,
}

impl Persister {
    /// Start the background writer, seeded with the restored state
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(store: Arc<dyn KeyValueStore>, key: impl Into<String>, initial: PersistedState) -> Self {
        let key = key.into();
        let location = store.describe(&key);
        let (tx, rx) = watch::channel(initial);
        let (shutdown, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run_writer(store, key, rx, shutdown_rx));

        Self {
            tx,
            worker: Mutex::new(Some(Worker { shutdown, handle })),
            location,
        }
    }

    /// Replace the session part of the record
    pub fn save_session(&self, session: Session) {
        self.warn_if_stopped();
        self.tx.send_modify(|state| state.session = session);
    }

    /// Replace the cache part of the record
    pub fn save_cache(&self, snapshot: Option<CacheSnapshot>) {
        self.warn_if_stopped();
        self.tx.send_modify(|state| state.cache = snapshot);
    }

    /// Latest value handed to the writer (not necessarily on disk yet)
    #[cfg(test)]
    pub(crate) fn latest(&self) -> PersistedState {
        self.tx.borrow().clone()
    }

    /// Where the record is stored
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Write any pending value and stop the writer
    ///
    /// Saves issued after a flush are kept in memory only.
    pub async fn flush(&self) {
        let worker = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        let Some(worker) = worker else {
            return;
        };

        // The writer may already be gone if the runtime is shutting down
        let _ = worker.shutdown.send(());
        if let Err(e) = worker.handle.await {
            warn!("Persistence writer ended abnormally: {}", e);
        }
        debug!("Persistence flushed to {}", self.location);
    }

    fn warn_if_stopped(&self) {
        if self.tx.is_closed() {
            warn!("Persistence writer stopped; change will not be saved");
        }
    }
}

async fn run_writer(
    store: Arc<dyn KeyValueStore>,
    key: String,
    mut rx: watch::Receiver<PersistedState>,
    mut shutdown: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = rx.borrow_and_update().clone();
                write_state(store.as_ref(), &key, &state).await;
            }
            _ = &mut shutdown => {
                if rx.has_changed().unwrap_or(false) {
                    let state = rx.borrow_and_update().clone();
                    write_state(store.as_ref(), &key, &state).await;
                }
                break;
            }
        }
    }
}

/// Persistence failures are logged and dropped; the in-memory state stays valid.
async fn write_state(store: &dyn KeyValueStore, key: &str, state: &PersistedState) {
    let content = match serde_json::to_string(state) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to serialize persisted state: {}", e);
            return;
        }
    };

    if let Err(e) = store.set(key, &content).await {
        warn!("Failed to persist state: {}", e);
    }
}
