//! Scripted [`Transport`] for tests.
//!
//! Responses are queued up front and handed out in order; every request is
//! recorded so tests can assert on method, path, query, body and headers.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use super::{HttpRequest, HttpResponse, Transport};
use crate::error::TransportError;

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<HttpResponse, TransportError>>,
    requests: Vec<HttpRequest>,
}

/// In-memory transport. Clones share the same script.
#[derive(Clone, Debug, Default)]
pub struct MockTransport {
    script: Arc<Mutex<Script>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_script<R>(&self, f: impl FnOnce(&mut Script) -> R) -> R {
        let mut guard = self.script.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut guard)
    }

    /// Queue a raw response.
    pub fn push_status(&self, status: u16, body: impl Into<String>) {
        let body = body.into();
        self.with_script(|s| s.responses.push_back(Ok(HttpResponse { status, body })));
    }

    /// Queue a `code: 0` envelope carrying `data`.
    pub fn push_ok(&self, data: Value) {
        self.push_status(200, json!({"code": 0, "message": "ok", "data": data}).to_string());
    }

    /// Queue a failure envelope with a `msg` field.
    pub fn push_rejected(&self, code: i32, msg: &str) {
        self.push_status(200, json!({"code": code, "msg": msg}).to_string());
    }

    /// Queue a transport-level failure.
    pub fn push_error(&self, error: TransportError) {
        self.with_script(|s| s.responses.push_back(Err(error)));
    }

    /// Requests seen so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.with_script(|s| s.requests.clone())
    }

    /// Number of requests seen so far.
    pub fn request_count(&self) -> usize {
        self.with_script(|s| s.requests.len())
    }
}

impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.with_script(|s| {
            s.requests.push(request);
            s.responses
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Network("no scripted response".to_string())))
        })
    }
}
