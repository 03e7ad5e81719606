//! Transport layer
//!
//! This module defines the transport trait and its implementations. A
//! transport moves one [`ApiRequest`] to the backend and returns the raw
//! [`ApiResponse`]; it knows nothing about credentials, JSON decoding or
//! status-code semantics. Those live in [`crate::api::ApiClient`].
//!
//! # Transport Types
//!
//! - **Reqwest**: HTTP over reqwest with a configurable timeout
//! - **Stub**: Scripted responses and request recording for tests and demos
//!
//! # Example
//!
//! ```
//! use tasksphere_client::transport::{ApiRequest, HttpMethod, StubTransport, Transport};
//!
//! # async fn example() {
//! let stub = StubTransport::new();
//! stub.respond_json(HttpMethod::Get, "/api/projects", 200, serde_json::json!([])).await;
//!
//! let response = stub.send(ApiRequest::get("/api/projects")).await.unwrap();
//! assert!(response.is_success());
//! # }
//! ```

pub mod http;
pub mod stub;
pub mod transport_trait;

// Re-export main types
pub use http::ReqwestTransport;
pub use stub::StubTransport;
pub use transport_trait::{
    ApiRequest, ApiResponse, HttpMethod, Transport, TransportError, TransportResult,
};
