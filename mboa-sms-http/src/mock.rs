//! Mock transport for testing.

use crate::error::TransportError;
use crate::request::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Semaphore;

type Responder = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

/// Transport that answers from a function and records every request.
///
/// Requests are recorded as soon as [`Transport::send`] is called, before any
/// gate is awaited, so the recorded order is the dispatch order.
pub struct MockTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<HttpRequest>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl MockTransport {
    /// Create a mock answering with `responder`.
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            gates: Mutex::new(HashMap::new()),
        }
    }

    /// Create a mock that returns the same JSON response to everything.
    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self::new(move |_| Ok(HttpResponse::json_body(status, &body)))
    }

    /// Hold every response for `path` until the returned gate is opened.
    pub fn gate(&self, path: impl Into<String>) -> MockGate {
        let semaphore = Arc::new(Semaphore::new(0));
        self.gates.lock().insert(path.into(), semaphore.clone());
        MockGate { semaphore }
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Requests received for `path`.
    pub fn calls_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    /// Number of requests received.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("requests", &self.request_count())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());

        let gate = self.gates.lock().get(&request.path).cloned();
        if let Some(semaphore) = gate {
            // Closing the semaphore releases every waiter.
            let _ = semaphore.acquire().await;
        }

        (self.responder)(request)
    }
}

/// Holds responses for one path until opened.
#[derive(Debug, Clone)]
pub struct MockGate {
    semaphore: Arc<Semaphore>,
}

impl MockGate {
    /// Release held and future responses.
    pub fn open(&self) {
        self.semaphore.close();
    }
}
