//! Process-wide session store

use crate::persist::Persister;
use crate::session::state::Session;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

/// Holds the current authentication token
///
/// Cheap to clone; all clones share the same state. Every `set`/`clear`
/// schedules a write through the attached [`Persister`].
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
    persister: Option<Arc<Persister>>,
}

impl SessionStore {
    /// Create an in-memory store with no persistence
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            persister: None,
        }
    }

    /// Create a store whose mutations are persisted
    pub fn with_persister(session: Session, persister: Arc<Persister>) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            persister: Some(persister),
        }
    }

    /// Current token, always the latest committed value
    pub fn get(&self) -> Option<String> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .token
            .clone()
    }

    /// Whether a token is present
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Store a token and mark the session authenticated
    ///
    /// The token is opaque. An empty token is never stored; it signs the
    /// session out instead.
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        if token.is_empty() {
            warn!("Refusing to store an empty token; clearing session");
            self.clear();
            return;
        }

        self.commit(Session::with_token(token));
        info!("Session authenticated");
    }

    /// Remove the token and mark the session unauthenticated
    pub fn clear(&self) {
        self.commit(Session::default());
        info!("Session cleared");
    }

    fn commit(&self, session: Session) {
        {
            let mut current = self.session.write().unwrap_or_else(PoisonError::into_inner);
            *current = session.clone();
        }

        if let Some(persister) = &self.persister {
            persister.save_session(session);
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Session::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{restore, KeyValueStore, MemoryStore, PersistedState};

    #[test]
    fn set_get_clear() {
        let store = SessionStore::default();
        assert_eq!(store.get(), None);

        store.set("abc");
        assert_eq!(store.get().as_deref(), Some("abc"));
        assert!(store.is_authenticated());

        store.clear();
        assert_eq!(store.get(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn clones_share_state() {
        let store = SessionStore::default();
        let other = store.clone();

        store.set("abc");
        assert_eq!(other.get().as_deref(), Some("abc"));
    }

    #[test]
    fn token_is_opaque() {
        let store = SessionStore::default();
        store.set("  not a jwt \u{1F511} ");
        assert_eq!(store.get().as_deref(), Some("  not a jwt \u{1F511} "));
    }

    #[test]
    fn empty_token_signs_out() {
        let store = SessionStore::new(Session::with_token("abc"));
        store.set("");
        assert_eq!(store.get(), None);
    }

    #[tokio::test]
    async fn mutations_are_persisted() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let persister = Arc::new(Persister::spawn(kv.clone(), "root", PersistedState::default()));
        let store = SessionStore::with_persister(Session::default(), persister.clone());

        store.set("abc");
        persister.flush().await;
        assert_eq!(restore(kv.as_ref(), "root").await.session, Session::with_token("abc"));
    }

    #[tokio::test]
    async fn clear_is_persisted() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let initial = PersistedState {
            session: Session::with_token("abc"),
            cache: None,
        };
        let persister = Arc::new(Persister::spawn(kv.clone(), "root", initial.clone()));
        let store = SessionStore::with_persister(initial.session, persister.clone());

        store.clear();
        persister.flush().await;
        assert_eq!(restore(kv.as_ref(), "root").await.session, Session::default());
    }
}
