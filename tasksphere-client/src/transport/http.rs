//! HTTP transport over reqwest
//!
//! Joins each request path onto a fixed base URL and forwards method, query,
//! headers and JSON body unchanged. Non-2xx responses are returned as normal
//! responses; only connection, timeout and I/O failures become errors.

use async_trait::async_trait;
use reqwest::{Client, Method};
use std::time::Duration;

use super::transport_trait::{
    ApiRequest, ApiResponse, HttpMethod, Transport, TransportError, TransportResult,
};

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport for `base_url` (e.g. `http://localhost:8080`)
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if the base URL is not http(s) or the
    /// underlying client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> TransportResult<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TransportError::InvalidRequest(format!(
                "Base URL must start with http:// or https://, got {}",
                base_url
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("tasksphere-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        Ok(ReqwestTransport { client, base_url })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else {
            TransportError::Io(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    async fn send(&self, request: ApiRequest) -> TransportResult<ApiResponse> {
        let url = self.url_for(&request.path);
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::trace!(
            method = %request.method,
            url = %url,
            status,
            "HTTP exchange complete"
        );

        Ok(ApiResponse { status, body })
    }
}
