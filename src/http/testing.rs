//! Scripted transport for unit tests

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Method, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Mutex, PoisonError};
use tokio::sync::Semaphore;

type Handler = Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync>;

/// Records every request and answers from a closure
///
/// A gated transport holds each request until [`release`](Self::release)
/// hands out a permit, which keeps fetches in flight for as long as a test
/// needs.
pub(crate) struct ScriptedTransport {
    handler: Handler,
    requests: Mutex<Vec<HttpRequest>>,
    gate: Option<Semaphore>,
}

impl ScriptedTransport {
    pub(crate) fn new(
        handler: impl Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub(crate) fn gated(
        handler: impl Fn(&HttpRequest) -> Result<HttpResponse, ApiError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(handler)
        }
    }

    /// Let `n` held requests proceed
    pub(crate) fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests seen for `method` on a URL ending with `path`
    pub(crate) fn count(&self, method: Method, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.url.ends_with(path))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?
                .forget();
        }

        (self.handler)(&request)
    }
}

/// JSON reply with the given status
pub(crate) fn reply(status: u16, body: Value) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse {
        status,
        body: body.to_string(),
    })
}

/// Let spawned tasks on the current-thread runtime make progress
pub(crate) async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
