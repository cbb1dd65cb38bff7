//! Transport abstraction
//!
//! Provides a trait for issuing raw HTTP requests so the dispatcher can be
//! driven by the real `ureq` client or by a scripted transport in tests.

use crate::error::ApiError;
use crate::http::Method;
use async_trait::async_trait;
use std::time::Duration;
use ureq::Agent;

/// Fully resolved outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Raw response, any status
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Abstract HTTP transport
///
/// Implementations report any answered request as `Ok`, whatever its
/// status; `Err` is reserved for requests that got no response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking `ureq` agent driven from tokio's blocking pool
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Create a transport; `None` keeps ureq's default timeouts
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut builder = Agent::config_builder().http_status_as_error(false);
        if let Some(timeout) = timeout {
            builder = builder.timeout_global(Some(timeout));
        }

        Self {
            agent: Agent::new_with_config(builder.build()),
        }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Transport for UreqTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();

        // ureq blocks; keep it off the async workers
        tokio::task::spawn_blocking(move || call(&agent, request))
            .await
            .map_err(|e| ApiError::Network(format!("Request task failed: {}", e)))?
            .map_err(|e| ApiError::Network(e.to_string()))
    }
}

fn call(agent: &Agent, request: HttpRequest) -> Result<HttpResponse, ureq::Error> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;

    let mut response = match method {
        Method::Get | Method::Delete => {
            let mut builder = if method == Method::Get {
                agent.get(url.as_str())
            } else {
                agent.delete(url.as_str())
            };
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()?
        }
        Method::Post | Method::Put => {
            let mut builder = if method == Method::Post {
                agent.post(url.as_str())
            } else {
                agent.put(url.as_str())
            };
            for (name, value) in &headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match body {
                Some(body) => builder.send(body.as_bytes())?,
                None => builder.send_empty()?,
            }
        }
    };

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string()?;
    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let request = HttpRequest {
            method: Method::Get,
            url: "http://localhost/tasks".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            body: None,
        };
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("Authorization"), None);
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let transport = UreqTransport::new(Some(Duration::from_secs(2)));
        let request = HttpRequest {
            method: Method::Get,
            url: "http://127.0.0.1:9/tasks".to_string(),
            headers: vec![],
            body: None,
        };

        let err = transport.execute(request).await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
