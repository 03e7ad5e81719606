//! Session credential primitives
//!
//! # Modules
//!
//! - [`token_store`]: Durable storage for the single bearer token (file-backed or in-memory)
//! - [`credentials`]: The credential provider every outbound request consults
//!
//! # Contract
//!
//! - Exactly one token is persisted, under a single key. Absence means logged out.
//! - Requests never read ambient transport state: the API client asks its
//!   [`credentials::CredentialProvider`] for the current token on every call.
//!
//! # Example
//!
//! ```
//! use tasksphere_shared::auth::credentials::{CredentialProvider, SessionCredentials};
//! use tasksphere_shared::auth::token_store::{MemoryTokenStore, TokenStore};
//!
//! let store = MemoryTokenStore::new();
//! store.save("abc123").unwrap();
//!
//! let credentials = SessionCredentials::new();
//! credentials.replace(store.load().unwrap());
//! assert_eq!(credentials.authorization_header().as_deref(), Some("Bearer abc123"));
//! ```

pub mod credentials;
pub mod token_store;
