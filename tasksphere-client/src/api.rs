//! API client
//!
//! Builds on a [`Transport`] with the three things every store needs:
//!
//! 1. **Credentials**: before sending, the client asks its
//!    [`CredentialProvider`] for the current token and sets
//!    `Authorization: Bearer <token>` when one exists. A request built while
//!    logged out carries no `Authorization` header at all.
//! 2. **Cancellation**: the transport future is raced against the caller's
//!    [`CancellationToken`]; a cancelled call returns
//!    [`ClientError::Cancelled`] and its response is discarded.
//! 3. **Status mapping**: non-2xx responses become [`ClientError`]s carrying
//!    the server's message, 2xx bodies are decoded as JSON.

use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tasksphere_shared::auth::credentials::CredentialProvider;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, ClientResult};
use crate::transport::{ApiRequest, ApiResponse, Transport};

/// Authenticated request executor shared by all stores
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    credentials: Arc<dyn CredentialProvider>,
}

impl ApiClient {
    /// Creates a client sending through `transport` with tokens from `credentials`
    pub fn new(transport: Arc<dyn Transport>, credentials: Arc<dyn CredentialProvider>) -> Self {
        ApiClient {
            transport,
            credentials,
        }
    }

    /// Name of the underlying transport
    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Attaches the current bearer token, if any
    pub fn authorize(&self, request: ApiRequest) -> ApiRequest {
        match self.credentials.authorization_header() {
            Some(header) => request.with_header("Authorization", header),
            None => request,
        }
    }

    /// Sends a request and returns the raw 2xx response
    ///
    /// # Errors
    ///
    /// - `Cancelled` if `cancel` fires before the response arrives
    /// - `Transport` if no response was received
    /// - `Unauthorized` / `NotFound` / `Rejected` for non-2xx statuses
    pub async fn execute(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> ClientResult<ApiResponse> {
        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let request = self.authorize(request);
        let method = request.method;
        let path = request.path.clone();

        tracing::debug!(
            method = %method,
            path = %path,
            authenticated = request.bearer_token().is_some(),
            "Sending request"
        );

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!(method = %method, path = %path, "Request cancelled");
                return Err(ClientError::Cancelled);
            }
            result = self.transport.send(request) => result?,
        };

        if response.is_success() {
            Ok(response)
        } else {
            tracing::debug!(
                method = %method,
                path = %path,
                status = response.status,
                "Request rejected"
            );
            Err(ClientError::from_status(response.status, &response.body))
        }
    }

    /// Sends a request and decodes the JSON response body
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> ClientResult<T> {
        let path = request.path.clone();
        let response = self.execute(request, cancel).await?;

        response.decode().map_err(|e| {
            tracing::warn!(path = %path, error = %e, "Response body did not decode");
            ClientError::Decode(e.to_string())
        })
    }

    /// Sends a request and ignores the response body
    pub async fn send(&self, request: ApiRequest, cancel: &CancellationToken) -> ClientResult<()> {
        self.execute(request, cancel).await.map(|_| ())
    }
}

/// Serializes a request body
pub fn to_body<T: Serialize>(value: &T) -> ClientResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| ClientError::Validation(e.to_string()))
}
