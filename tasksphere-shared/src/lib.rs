//! # TaskSphere Shared Library
//!
//! Wire types and session primitives shared by the TaskSphere client library
//! and the terminal application.
//!
//! ## Module Organization
//!
//! - `models`: User, project and task records as the REST backend sends them
//! - `auth`: Token persistence and the credential provider consulted on every request

pub mod auth;
pub mod models;

/// Current version of the TaskSphere shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
