//! Wire models for the TaskSphere REST backend
//!
//! Every record here mirrors the JSON the backend sends or accepts. Field
//! names are camelCase on the wire and enum values are SCREAMING_SNAKE_CASE.
//!
//! # Models
//!
//! - `user`: Login/register payloads and the user summary held by the session
//! - `project`: Projects and the input used to create or update them
//! - `task`: Tasks, their status/priority enums and weak references to projects and users
//! - `timestamp`: Lenient timestamp decoding shared by the records above
//!
//! # Example
//!
//! ```
//! use tasksphere_shared::models::project::{Project, ProjectStatus};
//!
//! let project: Project = serde_json::from_str(
//!     r#"{"id": 7, "name": "Launch", "description": "Q1 launch", "status": "ACTIVE"}"#,
//! ).unwrap();
//!
//! assert_eq!(project.id, 7);
//! assert_eq!(project.status, ProjectStatus::Active);
//! ```

pub mod project;
pub mod task;
pub mod timestamp;
pub mod user;

/// Record identifier assigned by the backend
pub type RecordId = i64;
