//! Mutations and the coordinator that applies their side effects

use crate::api::endpoints;
use crate::api::models::{
    LoginPayload, LoginResponse, ResetPasswordPayload, SignupPayload, TaskPayload,
};
use crate::api::queries::TASK;
use crate::api::validate::{self, Validate};
use crate::cache::{ResourceCache, Tag};
use crate::error::ApiError;
use crate::http::{ApiRequest, ApiResponse, Dispatcher, Method};
use crate::session::SessionStore;
use tracing::{debug, info};

/// A state-changing API call
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Signup(SignupPayload),
    Login(LoginPayload),
    ResetPassword(ResetPasswordPayload),
    CreateTask(TaskPayload),
    UpdateTask { id: String, payload: TaskPayload },
    DeleteTask { id: String },
}

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Signup(_) => "signup",
            Self::Login(_) => "login",
            Self::ResetPassword(_) => "reset-password",
            Self::CreateTask(_) => "create-task",
            Self::UpdateTask { .. } => "update-task",
            Self::DeleteTask { .. } => "delete-task",
        }
    }

    /// Check the input locally
    pub fn validate(&self) -> Result<(), ApiError> {
        match self {
            Self::Signup(payload) => payload.validate(),
            Self::Login(payload) => payload.validate(),
            Self::ResetPassword(payload) => payload.validate(),
            Self::CreateTask(payload) => payload.validate(),
            Self::UpdateTask { id, payload } => {
                validate::task_id(id)?;
                payload.validate()
            }
            Self::DeleteTask { id } => validate::task_id(id),
        }
    }

    /// Request issued for this mutation
    pub fn request(&self) -> Result<ApiRequest, ApiError> {
        let request = match self {
            Self::Signup(payload) => ApiRequest::new(Method::Post, endpoints::SIGNUP)
                .with_body(serde_json::to_value(payload)?),
            Self::Login(payload) => ApiRequest::new(Method::Post, endpoints::LOGIN)
                .with_body(serde_json::to_value(payload)?),
            Self::ResetPassword(payload) => ApiRequest::new(Method::Post, endpoints::RESET_PASSWORD)
                .with_body(serde_json::to_value(payload)?),
            Self::CreateTask(payload) => ApiRequest::new(Method::Post, endpoints::TASKS)
                .with_body(serde_json::to_value(payload)?),
            Self::UpdateTask { id, payload } => ApiRequest::new(Method::Put, endpoints::task(id))
                .with_body(serde_json::to_value(payload)?),
            Self::DeleteTask { id } => ApiRequest::new(Method::Delete, endpoints::task(id)),
        };
        Ok(request)
    }

    /// Tags whose entries go stale once this mutation succeeds
    pub fn invalidates(&self) -> Vec<Tag> {
        match self {
            Self::CreateTask(_) => vec![Tag::kind(TASK)],
            Self::UpdateTask { id, .. } | Self::DeleteTask { id } => {
                vec![Tag::kind(TASK), Tag::item(TASK, id.as_str())]
            }
            Self::Signup(_) | Self::Login(_) | Self::ResetPassword(_) => Vec::new(),
        }
    }
}

/// Runs mutations and applies their session and cache effects
///
/// Effects are applied only on success; a failed mutation leaves the
/// session and the cache exactly as they were.
#[derive(Clone)]
pub struct MutationCoordinator {
    dispatcher: Dispatcher,
    cache: ResourceCache,
    session: SessionStore,
}

impl MutationCoordinator {
    pub fn new(dispatcher: Dispatcher, cache: ResourceCache, session: SessionStore) -> Self {
        Self {
            dispatcher,
            cache,
            session,
        }
    }

    pub async fn mutate(&self, mutation: Mutation) -> Result<ApiResponse, ApiError> {
        if let Err(e) = mutation.validate() {
            debug!("{} rejected locally: {}", mutation.name(), e);
            return Err(e);
        }

        let request = mutation.request()?;
        let response = match self.dispatcher.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                debug!("{} failed: {}", mutation.name(), e);
                return Err(e);
            }
        };

        match &mutation {
            Mutation::Login(_) => {
                let login: LoginResponse = response.json()?;
                self.session.set(login.token);
            }
            Mutation::ResetPassword(_) => self.session.clear(),
            _ => {}
        }

        let tags = mutation.invalidates();
        if !tags.is_empty() {
            self.cache.invalidate(&tags);
        }

        info!("{} succeeded (HTTP {})", mutation.name(), response.status);
        Ok(response)
    }
}
