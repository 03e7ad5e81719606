//! # TaskSphere Application
//!
//! Text front end for the TaskSphere backend, built on the session and
//! resource stores of `tasksphere-client`.
//!
//! ## Modules
//!
//! - `app`: Application state shared by every view
//! - `config`: Configuration management
//! - `error`: Error handling and banner text
//! - `routes`: View routes and the route guard in front of them
//! - `views`: Text renderers and form actions

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
pub mod views;
