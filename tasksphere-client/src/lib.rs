//! # TaskSphere Client Library
//!
//! Session and data-synchronization layer for the TaskSphere REST backend.
//! Each store is an explicitly constructed service object holding one piece
//! of client state and keeping it consistent with the remote collection.
//!
//! ## Modules
//!
//! - `transport`: Transport trait, reqwest implementation and a scripted stub
//! - `api`: Request building with explicit credential attachment
//! - `error`: Client error taxonomy
//! - `session`: Session store (token, user, login/logout lifecycle)
//! - `store`: Generic resource store plus the project and task stores
//! - `guard`: Route guard decisions derived from session state
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tasksphere_client::{api::ApiClient, session::SessionStore, transport::ReqwestTransport};
//! use tasksphere_shared::auth::{credentials::SessionCredentials, token_store::FileTokenStore};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = SessionCredentials::new();
//! let transport = ReqwestTransport::new("http://localhost:8080", std::time::Duration::from_secs(30))?;
//! let api = ApiClient::new(Arc::new(transport), Arc::new(credentials.clone()));
//!
//! let session = SessionStore::new(api, credentials, Arc::new(FileTokenStore::new(".tasksphere/token")));
//! session.login("alice", "secret", &CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod guard;
pub mod session;
pub mod store;
pub mod transport;

pub use error::{ClientError, ClientResult};
