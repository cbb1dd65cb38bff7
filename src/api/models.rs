//! REST request and response bodies

use serde::{Deserialize, Serialize};

/// A task as returned by `GET /tasks` and `GET /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

impl LoginPayload {
    /// Email is trimmed and lowercased
    pub fn new(email: &str, password: impl Into<String>) -> Self {
        Self {
            email: normalize_email(email),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupPayload {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupPayload {
    /// Name is trimmed; email is trimmed and lowercased
    pub fn new(name: &str, email: &str, password: impl Into<String>) -> Self {
        Self {
            name: name.trim().to_string(),
            email: normalize_email(email),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    pub current_password: String,
    pub new_password: String,

    /// Repeated new password; checked locally, never sent
    #[serde(skip)]
    pub confirm_new_password: Option<String>,
}

impl ResetPasswordPayload {
    pub fn new(current: impl Into<String>, new: impl Into<String>) -> Self {
        Self {
            current_password: current.into(),
            new_password: new.into(),
            confirm_new_password: None,
        }
    }

    pub fn with_confirmation(mut self, confirm: impl Into<String>) -> Self {
        self.confirm_new_password = Some(confirm.into());
        self
    }
}

/// Body of `POST /tasks` and `PUT /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    pub description: String,
}

impl TaskPayload {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// `{message}` reply shared by most endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
