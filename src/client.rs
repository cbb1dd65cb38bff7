//! Client context: one object owning every component
//!
//! Built once per process after the persisted record has been restored,
//! handed to whoever needs the API, and shut down (flushed) before exit.

use crate::api::{
    queries, validate, LoginPayload, MessageResponse, Mutation, MutationCoordinator, ResetPasswordPayload,
    SignupPayload, Task, TaskPayload,
};
use crate::cache::ResourceCache;
use crate::config::{Config, ConfigManager};
use crate::error::{TaskdeckError, TaskdeckResult};
use crate::http::{Dispatcher, Transport, UreqTransport};
use crate::persist::{self, FileStore, KeyValueStore, Persister};
use crate::session::SessionStore;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Task API client
pub struct TaskClient {
    session: SessionStore,
    dispatcher: Dispatcher,
    cache: ResourceCache,
    mutations: MutationCoordinator,
    persister: Arc<Persister>,
    persist_cache: bool,
}

impl TaskClient {
    /// Restore persisted state and wire the components around it
    pub async fn bootstrap(
        config: &Config,
        store: Arc<dyn KeyValueStore>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let key = config.storage.root_key.clone();
        let restored = persist::restore(store.as_ref(), &key).await;
        let session_state = restored.session.clone();
        let snapshot = restored.cache.clone();

        let persister = Arc::new(Persister::spawn(store, key, restored));
        let session = SessionStore::with_persister(session_state, persister.clone());
        let dispatcher = Dispatcher::new(config.api.base_url.as_str(), transport, session.clone());
        let cache = ResourceCache::new(dispatcher.clone());

        if config.cache.persist {
            if let Some(snapshot) = snapshot {
                cache.restore(snapshot);
            }
        }

        let mutations = MutationCoordinator::new(dispatcher.clone(), cache.clone(), session.clone());

        Self {
            session,
            dispatcher,
            cache,
            mutations,
            persister,
            persist_cache: config.cache.persist,
        }
    }

    /// Client backed by the on-disk store and the `ureq` transport
    pub async fn connect(config: &Config) -> TaskdeckResult<Self> {
        let dir = ConfigManager::storage_dir(config);
        let store = FileStore::open(&dir).await?;
        debug!("Using state directory {}", dir.display());

        let transport = UreqTransport::new(config.api.timeout_secs.map(Duration::from_secs));
        Ok(Self::bootstrap(config, Arc::new(store), Arc::new(transport)).await)
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn cache(&self) -> &ResourceCache {
        &self.cache
    }

    pub fn mutations(&self) -> &MutationCoordinator {
        &self.mutations
    }

    pub fn base_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    /// Where the persisted record lives
    pub fn store_location(&self) -> &str {
        self.persister.location()
    }

    pub async fn signup(&self, name: &str, email: &str, password: &str) -> TaskdeckResult<String> {
        let payload = SignupPayload::new(name, email, password);
        self.run(Mutation::Signup(payload)).await
    }

    pub async fn login(&self, email: &str, password: &str) -> TaskdeckResult<String> {
        let payload = LoginPayload::new(email, password);
        self.run(Mutation::Login(payload)).await
    }

    /// Forget the token locally; the server is not contacted
    pub fn logout(&self) {
        self.session.clear();
    }

    /// Change the password, then sign out; returns the server's message
    pub async fn reset_password(
        &self,
        current: &str,
        new: &str,
        confirm: Option<&str>,
    ) -> TaskdeckResult<String> {
        let mut payload = ResetPasswordPayload::new(current, new);
        if let Some(confirm) = confirm {
            payload = payload.with_confirmation(confirm);
        }
        self.run(Mutation::ResetPassword(payload)).await
    }

    pub async fn tasks(&self) -> TaskdeckResult<Vec<Task>> {
        self.require_endpoint()?;
        let data = self.cache.read(&queries::tasks()).await?;
        decode(data)
    }

    /// Task list straight from the server, replacing the cached copy
    pub async fn refresh_tasks(&self) -> TaskdeckResult<Vec<Task>> {
        self.require_endpoint()?;
        let data = self.cache.refetch(&queries::tasks()).await?;
        decode(data)
    }

    pub async fn task(&self, id: &str) -> TaskdeckResult<Task> {
        self.require_endpoint()?;
        validate::task_id(id)?;
        let data = self.cache.read(&queries::task(id)).await?;
        decode(data)
    }

    pub async fn create_task(&self, title: &str, description: &str) -> TaskdeckResult<String> {
        self.run(Mutation::CreateTask(TaskPayload::new(title, description)))
            .await
    }

    pub async fn update_task(
        &self,
        id: &str,
        title: &str,
        description: &str,
    ) -> TaskdeckResult<String> {
        self.run(Mutation::UpdateTask {
            id: id.to_string(),
            payload: TaskPayload::new(title, description),
        })
        .await
    }

    pub async fn delete_task(&self, id: &str) -> TaskdeckResult<String> {
        self.run(Mutation::DeleteTask { id: id.to_string() }).await
    }

    /// Persist the cache snapshot (if enabled) and flush the record
    pub async fn shutdown(self) {
        let snapshot = if self.persist_cache {
            Some(self.cache.snapshot())
        } else {
            None
        };
        self.persister.save_cache(snapshot);
        self.persister.flush().await;
    }

    async fn run(&self, mutation: Mutation) -> TaskdeckResult<String> {
        self.require_endpoint()?;
        let response = self.mutations.mutate(mutation).await?;
        let message: MessageResponse = response.json().unwrap_or_default();
        Ok(message.message)
    }

    fn require_endpoint(&self) -> TaskdeckResult<()> {
        if self.dispatcher.base_url().is_empty() {
            return Err(TaskdeckError::BaseUrlMissing);
        }
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(data: Value) -> TaskdeckResult<T> {
    serde_json::from_value(data).map_err(|e| TaskdeckError::Api(e.into()))
}
