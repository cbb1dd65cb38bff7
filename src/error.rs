//! Error types for Taskdeck
//!
//! Request-level failures are [`ApiError`]; everything the CLI can hit is
//! wrapped in [`TaskdeckError`]. All modules outside the request path use
//! `TaskdeckResult<T>` as their return type.

use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

/// Fallback shown when neither the server nor the local error has a message
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";

/// Result type alias for Taskdeck operations
pub type TaskdeckResult<T> = Result<T, TaskdeckError>;

/// Failure of a single API request
///
/// Cloneable so one in-flight fetch can hand the same outcome to every
/// caller that joined it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Transport failure, no response received
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("API error (HTTP {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        status: u16,
        message: Option<String>,
        body: Option<Value>,
    },

    /// Response body could not be decoded
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Local input check failed; the request was never sent
    #[error("{0}")]
    Validation(String),
}

impl ApiError {
    /// Build a status error, pulling `message` out of a JSON body if present
    pub fn from_status(status: u16, body: Option<Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string);
        Self::Status {
            status,
            message,
            body,
        }
    }

    /// HTTP status, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for the user-visible notification channel
    ///
    /// Prefers the server-supplied `message`, then the local error's own
    /// message, then a generic fallback.
    pub fn display_message(&self) -> String {
        let local = match self {
            Self::Status {
                message: Some(message),
                ..
            } => return message.clone(),
            Self::Status { .. } => return UNEXPECTED_ERROR.to_string(),
            Self::Network(message) | Self::Serialization(message) | Self::Validation(message) => {
                message
            }
        };

        if local.trim().is_empty() {
            UNEXPECTED_ERROR.to_string()
        } else {
            local.clone()
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// All errors that can occur in Taskdeck
#[derive(Error, Debug)]
pub enum TaskdeckError {
    // Request errors
    #[error("{}", .0.display_message())]
    Api(#[from] ApiError),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("API base URL is not configured")]
    BaseUrlMissing,

    // Storage errors
    #[error("Failed to persist state: {0}")]
    Persist(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl TaskdeckError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Requests are never retried automatically
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Api(err) if err.status() == Some(401) => Some("Run: taskdeck login"),
            Self::Api(ApiError::Network(_)) => {
                Some("Check api.base_url with: taskdeck config show")
            }
            Self::BaseUrlMissing => {
                Some("Run: taskdeck config set api.base_url <url> (or pass --base-url)")
            }
            _ => None,
        }
    }
}
