//! HTTP plumbing: transport abstraction and the request dispatcher
//!
//! The dispatcher attaches the bearer token and JSON content type to every
//! request and turns raw responses into [`ApiResponse`] or a typed
//! [`ApiError`](crate::error::ApiError). It never retries and never touches
//! the session or the cache.

pub mod dispatcher;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;

pub use dispatcher::Dispatcher;
pub use transport::{HttpRequest, HttpResponse, Transport, UreqTransport};

use crate::error::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the configured base URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Successful (2xx) response with its decoded JSON body
///
/// An empty body decodes to `Value::Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: Value,
}

impl ApiResponse {
    /// Decode the body into a typed response
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn method_display() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(serde_json::to_string(&Method::Put).unwrap(), "\"PUT\"");
    }

    #[test]
    fn response_decodes_typed() {
        #[derive(Debug, Deserialize)]
        struct Message {
            message: String,
        }

        let response = ApiResponse {
            status: 200,
            data: json!({"message": "ok"}),
        };
        assert_eq!(response.json::<Message>().unwrap().message, "ok");

        let err = ApiResponse {
            status: 200,
            data: json!([1, 2]),
        }
        .json::<Message>()
        .unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
    }
}
