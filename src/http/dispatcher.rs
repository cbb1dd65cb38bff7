//! Request dispatcher

use crate::error::ApiError;
use crate::http::{ApiRequest, ApiResponse, HttpRequest, HttpResponse, Method, Transport};
use crate::session::SessionStore;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Issues API requests on behalf of the cache and the mutation coordinator
///
/// The token is read from the [`SessionStore`] on every send, never cached.
#[derive(Clone)]
pub struct Dispatcher {
    base_url: String,
    transport: Arc<dyn Transport>,
    session: SessionStore,
}

impl Dispatcher {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>, session: SessionStore) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            session,
        }
    }

    /// Base URL with any trailing slash removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one request and decode the response
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse, ApiError> {
        let mut headers = Vec::with_capacity(2);
        if let Some(token) = self.session.get() {
            headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
        headers.push(("Content-Type".to_string(), "application/json".to_string()));

        let body = body.map(serde_json::to_string).transpose()?;
        let request = HttpRequest {
            method,
            url: self.url(path),
            headers,
            body,
        };

        debug!("{} {}", method, path);
        let response = self.transport.execute(request).await.inspect_err(|e| {
            debug!("{} {} failed: {}", method, path, e);
        })?;
        debug!("{} {} -> {}", method, path, response.status);

        decode(response)
    }

    /// Send a prepared request
    pub async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        self.send(request.method, &request.path, request.body.as_ref())
            .await
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn decode(response: HttpResponse) -> Result<ApiResponse, ApiError> {
    let HttpResponse { status, body } = response;
    let body = body.trim();

    if (200..300).contains(&status) {
        let data = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body)?
        };
        return Ok(ApiResponse { status, data });
    }

    let parsed = if body.is_empty() {
        None
    } else {
        serde_json::from_str(body).ok()
    };
    Err(ApiError::from_status(status, parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::testing::{reply, ScriptedTransport};
    use serde_json::json;

    fn dispatcher(transport: Arc<ScriptedTransport>, session: SessionStore) -> Dispatcher {
        Dispatcher::new("http://api.test/", transport, session)
    }

    #[tokio::test]
    async fn attaches_bearer_token_and_content_type() {
        let transport = Arc::new(ScriptedTransport::new(|_| reply(200, json!([]))));
        let session = SessionStore::default();
        session.set("abc");

        dispatcher(transport.clone(), session)
            .send(Method::Get, "/tasks", None)
            .await
            .unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.url, "http://api.test/tasks");
        assert_eq!(sent.header("authorization"), Some("Bearer abc"));
        assert_eq!(sent.header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn no_token_no_authorization_header() {
        let transport = Arc::new(ScriptedTransport::new(|_| reply(200, json!({"message": "ok"}))));

        dispatcher(transport.clone(), SessionStore::default())
            .send(Method::Post, "/signup", Some(&json!({"name": "a"})))
            .await
            .unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.header("Authorization"), None);
        assert_eq!(sent.header("Content-Type"), Some("application/json"));
        assert_eq!(sent.body.as_deref(), Some(r#"{"name":"a"}"#));
    }

    #[tokio::test]
    async fn reads_latest_token_every_time() {
        let transport = Arc::new(ScriptedTransport::new(|_| reply(200, json!([]))));
        let session = SessionStore::default();
        let dispatcher = dispatcher(transport.clone(), session.clone());

        session.set("first");
        dispatcher.send(Method::Get, "/tasks", None).await.unwrap();
        session.clear();
        dispatcher.send(Method::Get, "/tasks", None).await.unwrap();
        session.set("second");
        dispatcher.send(Method::Get, "/tasks", None).await.unwrap();

        let auth: Vec<_> = transport
            .requests()
            .iter()
            .map(|r| r.header("Authorization").map(str::to_string))
            .collect();
        assert_eq!(
            auth,
            vec![
                Some("Bearer first".to_string()),
                None,
                Some("Bearer second".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn non_2xx_surfaces_status_and_message() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            reply(404, json!({"message": "not found"}))
        }));

        let err = dispatcher(transport, SessionStore::default())
            .send(Method::Delete, "/tasks/42", None)
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(404));
        assert_eq!(err.display_message(), "not found");
    }

    #[tokio::test]
    async fn non_json_error_body_has_no_message() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(HttpResponse {
                status: 502,
                body: "<html>Bad Gateway</html>".to_string(),
            })
        }));

        let err = dispatcher(transport, SessionStore::default())
            .send(Method::Get, "/tasks", None)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::Status {
                status: 502,
                message: None,
                body: None
            }
        );
    }

    #[tokio::test]
    async fn malformed_success_body_is_serialization_error() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(HttpResponse {
                status: 200,
                body: "{\"id\":".to_string(),
            })
        }));

        let err = dispatcher(transport, SessionStore::default())
            .send(Method::Get, "/tasks", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
    }

    #[tokio::test]
    async fn empty_success_body_is_null() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(HttpResponse {
                status: 204,
                body: String::new(),
            })
        }));

        let response = dispatcher(transport, SessionStore::default())
            .send(Method::Delete, "/tasks/1", None)
            .await
            .unwrap();
        assert_eq!(response.data, Value::Null);
    }

    #[tokio::test]
    async fn transport_failure_is_passed_through() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Err(ApiError::Network("connection refused".to_string()))
        }));

        let err = dispatcher(transport.clone(), SessionStore::default())
            .send(Method::Get, "/tasks", None)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".to_string()));
        assert_eq!(transport.requests().len(), 1);
    }
}
