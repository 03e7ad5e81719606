//! Application state
//!
//! Wires the transport, credential slot, token storage and the three stores
//! into one [`AppState`] that every view receives. There is exactly one
//! instance per application session; clones share the same stores.
//!
//! # Example
//!
//! ```no_run
//! use tasksphere_app::{app::AppState, config::Config};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let state = AppState::from_config(config)?;
//! state.session.initialize(&CancellationToken::new()).await.ok();
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use std::sync::Arc;
use tasksphere_client::api::ApiClient;
use tasksphere_client::session::SessionStore;
use tasksphere_client::store::{ProjectStore, TaskStore};
use tasksphere_client::transport::{ReqwestTransport, Transport};
use tasksphere_shared::auth::credentials::SessionCredentials;
use tasksphere_shared::auth::token_store::{FileTokenStore, TokenStore};

/// Shared application state
///
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<Config>,

    /// Session store (token, user)
    pub session: Arc<SessionStore>,

    /// Project store
    pub projects: Arc<ProjectStore>,

    /// Task store
    pub tasks: Arc<TaskStore>,
}

impl AppState {
    /// Creates state over an explicit transport and token store
    pub fn new(config: Config, transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        let credentials = SessionCredentials::new();
        let api = ApiClient::new(transport, Arc::new(credentials.clone()));

        tracing::debug!(
            transport = api.transport_name(),
            base_url = %config.api.base_url,
            "Building application state"
        );

        Self {
            config: Arc::new(config),
            session: Arc::new(SessionStore::new(api.clone(), credentials, tokens)),
            projects: Arc::new(ProjectStore::new(api.clone())),
            tasks: Arc::new(TaskStore::new(api)),
        }
    }

    /// Creates state talking HTTP to the configured backend and persisting
    /// the token to the configured file
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let transport = ReqwestTransport::new(config.api.base_url.clone(), config.request_timeout())?;
        let tokens = FileTokenStore::new(config.storage.token_path.clone());

        Ok(Self::new(config, Arc::new(transport), Arc::new(tokens)))
    }
}
