//! Credential provider
//!
//! The API client attaches credentials by asking a [`CredentialProvider`]
//! for the current bearer token on every request. There is no shared default
//! header: whatever the provider returns at the moment a request is built is
//! what goes on the wire.
//!
//! [`SessionCredentials`] is the provider the session store publishes into.
//! Clones share the same slot, so the store and every API client observe the
//! same token.

use std::sync::Arc;
use tokio::sync::watch;

/// Source of the bearer token attached to outbound requests
pub trait CredentialProvider: Send + Sync {
    /// Current token, `None` when unauthenticated
    fn bearer_token(&self) -> Option<String>;

    /// `Authorization` header value for the current token
    fn authorization_header(&self) -> Option<String> {
        self.bearer_token().map(|token| format!("Bearer {}", token))
    }
}

/// Shared, observable token slot
#[derive(Debug, Clone)]
pub struct SessionCredentials {
    token: Arc<watch::Sender<Option<String>>>,
}

impl SessionCredentials {
    /// Creates an empty slot
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        SessionCredentials { token: Arc::new(tx) }
    }

    /// Publishes a token
    pub fn set(&self, token: impl Into<String>) {
        self.token.send_replace(Some(token.into()));
    }

    /// Removes the token. Idempotent.
    pub fn clear(&self) {
        self.token.send_replace(None);
    }

    /// Replaces the slot content wholesale
    pub fn replace(&self, token: Option<String>) {
        self.token.send_replace(token);
    }

    /// Subscribes to token changes
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token.subscribe()
    }
}

impl Default for SessionCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for SessionCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.borrow().clone()
    }
}

/// Provider with a fixed token, for scripts and tests
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    token: Option<String>,
}

impl StaticCredentials {
    /// Always returns `token`
    pub fn new(token: impl Into<String>) -> Self {
        StaticCredentials {
            token: Some(token.into()),
        }
    }

    /// Never returns a token
    pub fn anonymous() -> Self {
        StaticCredentials { token: None }
    }
}

impl CredentialProvider for StaticCredentials {
    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }
}
