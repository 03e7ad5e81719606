//! Core Transport trait and types
//!
//! This module defines the contract every transport implements.
//!
//! # Transport Contract
//!
//! All transports must:
//! 1. Implement the `Transport` trait (async)
//! 2. Send the request exactly as given: method, path, query, headers, JSON body
//! 3. Return any HTTP response, success or not, as `Ok(ApiResponse)`
//! 4. Reserve `Err(TransportError)` for requests that never produced a response
//!
//! Cancellation is handled one level up by dropping the `send` future, so
//! implementations must not leave shared state inconsistent at an `.await`.
//!
//! # Request Flow
//!
//! ```text
//! Store operation
//!   ├─> ApiClient::execute()  attach credentials, race against cancel token
//!   │     └─> Transport::send()
//!   └─> ApiClient maps status codes to ClientError and decodes JSON
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::fmt;

/// Transport error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Could not connect to the backend
    #[error("Connection failed: {0}")]
    Connect(String),

    /// Request exceeded the transport timeout
    #[error("Request timed out")]
    Timeout,

    /// Request could not be built (bad URL, unserializable body)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Any other failure while sending or reading the response
    #[error("Transport I/O error: {0}")]
    Io(String),
}

/// Transport result type alias
pub type TransportResult<T> = Result<T, TransportError>;

/// HTTP methods used by the backend contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Upper-case method name
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outbound request
///
/// `path` is relative to the backend base URL and always starts with `/`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: HttpMethod,

    /// Path relative to the base URL
    pub path: String,

    /// Query parameters, in order
    pub query: Vec<(String, String)>,

    /// Extra headers, in order
    pub headers: Vec<(String, String)>,

    /// JSON body
    pub body: Option<JsonValue>,
}

impl ApiRequest {
    /// Creates a request with no query, headers or body
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a GET request
    pub fn get(path: impl Into<String>) -> Self {
        ApiRequest::new(HttpMethod::Get, path)
    }

    /// Creates a POST request with a JSON body
    pub fn post(path: impl Into<String>, body: JsonValue) -> Self {
        ApiRequest::new(HttpMethod::Post, path).with_body(body)
    }

    /// Creates a PUT request with a JSON body
    pub fn put(path: impl Into<String>, body: JsonValue) -> Self {
        ApiRequest::new(HttpMethod::Put, path).with_body(body)
    }

    /// Creates a DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        ApiRequest::new(HttpMethod::Delete, path)
    }

    /// Appends a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Sets a header, replacing an existing one with the same name (case-insensitive)
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    /// Sets the JSON body
    pub fn with_body(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// Looks up a header (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Looks up a query parameter
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Token carried in the `Authorization: Bearer` header, if any
    pub fn bearer_token(&self) -> Option<&str> {
        self.header("authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
    }
}

/// Raw response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body as text (empty when the backend sent none)
    pub body: String,
}

impl ApiResponse {
    /// Creates a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        ApiResponse {
            status,
            body: body.into(),
        }
    }

    /// Creates a response with a JSON body
    pub fn json(status: u16, body: &JsonValue) -> Self {
        ApiResponse::new(status, body.to_string())
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body as JSON
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Core Transport trait
///
/// All transports must implement this trait.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Returns the transport name
    ///
    /// Used for logging.
    fn name(&self) -> &str;

    /// Sends a request and returns the backend's response
    ///
    /// # Returns
    ///
    /// `Ok` for every HTTP response, including 4xx/5xx.
    /// `Err` only when no response was received.
    async fn send(&self, request: ApiRequest) -> TransportResult<ApiResponse>;
}
