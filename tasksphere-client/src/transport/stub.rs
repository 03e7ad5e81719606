//! Stub transport for testing and demos
//!
//! Replies with scripted responses and records every request it receives.
//! Useful for:
//! - Testing the stores without a running backend
//! - Asserting on outbound credentials, paths and bodies
//! - Exercising cancellation with an artificial latency
//!
//! # Scripting
//!
//! Replies are queued per `(method, path)`. Each request pops the next
//! reply; the last one stays in place and answers every further request.
//! Requests with no script get `404` with a descriptive body.
//!
//! # Example
//!
//! ```
//! use tasksphere_client::transport::{ApiRequest, HttpMethod, StubTransport, Transport};
//!
//! # async fn example() {
//! let stub = StubTransport::new();
//! stub.respond(HttpMethod::Post, "/api/auth/login", 400, "Invalid username or password").await;
//!
//! let response = stub
//!     .send(ApiRequest::post("/api/auth/login", serde_json::json!({"username": "alice"})))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(response.status, 400);
//! assert_eq!(stub.request_count().await, 1);
//! # }
//! ```

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, VecDeque};
use tokio::sync::Mutex;
use tokio::time::{sleep, Duration};

use super::transport_trait::{
    ApiRequest, ApiResponse, HttpMethod, Transport, TransportError, TransportResult,
};

/// One scripted reply
#[derive(Debug, Clone)]
enum StubReply {
    Response(ApiResponse),
    Failure(TransportError),
}

type RouteKey = (HttpMethod, String);

/// Stub transport implementation
#[derive(Debug, Default)]
pub struct StubTransport {
    /// Scripted replies per route
    routes: Mutex<HashMap<RouteKey, VecDeque<StubReply>>>,

    /// Every request received, in arrival order
    requests: Mutex<Vec<ApiRequest>>,

    /// Delay applied before answering
    latency: Option<Duration>,
}

impl StubTransport {
    /// Creates a stub with no scripted routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every reply by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    async fn push(&self, method: HttpMethod, path: &str, reply: StubReply) {
        self.routes
            .lock()
            .await
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
    }

    /// Scripts a plain-text reply
    pub async fn respond(&self, method: HttpMethod, path: &str, status: u16, body: impl Into<String>) {
        self.push(method, path, StubReply::Response(ApiResponse::new(status, body)))
            .await;
    }

    /// Scripts a JSON reply
    pub async fn respond_json(&self, method: HttpMethod, path: &str, status: u16, body: JsonValue) {
        self.push(method, path, StubReply::Response(ApiResponse::json(status, &body)))
            .await;
    }

    /// Scripts a transport failure (no response at all)
    pub async fn fail(&self, method: HttpMethod, path: &str, error: TransportError) {
        self.push(method, path, StubReply::Failure(error)).await;
    }

    /// Every request received so far
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }

    /// Most recent request
    pub async fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().await.last().cloned()
    }

    /// Number of requests received
    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Requests received for one route
    pub async fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .await
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    async fn next_reply(&self, method: HttpMethod, path: &str) -> Option<StubReply> {
        let mut routes = self.routes.lock().await;
        let queue = routes.get_mut(&(method, path.to_string()))?;

        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn name(&self) -> &str {
        "stub"
    }

    async fn send(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        let method = request.method;
        let path = request.path.clone();

        self.requests.lock().await.push(request);

        if let Some(latency) = self.latency {
            sleep(latency).await;
        }

        match self.next_reply(method, &path).await {
            Some(StubReply::Response(response)) => Ok(response),
            Some(StubReply::Failure(error)) => Err(error),
            None => {
                tracing::debug!(method = %method, path = %path, "Stub has no scripted reply");
                Ok(ApiResponse::new(404, format!("No stub for {} {}", method, path)))
            }
        }
    }
}
