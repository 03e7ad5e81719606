//! Project records
//!
//! Projects are owned by the user who created them. Identity is the
//! backend-assigned `id`; the client never invents one.
//!
//! # Status
//!
//! ```text
//! ACTIVE | COMPLETED | ON_HOLD | CANCELLED
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::{timestamp, user::UserRef, RecordId};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    /// Work in progress (default for new projects)
    #[default]
    Active,

    /// Finished
    Completed,

    /// Paused
    OnHold,

    /// Abandoned
    Cancelled,
}

impl ProjectStatus {
    /// Every status, in display order
    pub const ALL: [ProjectStatus; 4] = [
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
        ProjectStatus::Cancelled,
    ];

    /// Wire name, also used as the path segment of `/api/projects/status/{status}`
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "ACTIVE",
            ProjectStatus::Completed => "COMPLETED",
            ProjectStatus::OnHold => "ON_HOLD",
            ProjectStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    /// Case-insensitive, accepting `-` or space in place of `_`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        ProjectStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("Unknown project status: {}", s))
    }
}

/// Project as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Backend-assigned ID
    pub id: RecordId,

    /// Project name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Lifecycle status
    pub status: ProjectStatus,

    /// Planned start
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    /// Planned end
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    /// When the backend stored the project
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Owner, when embedded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserRef>,
}

/// Input for creating or updating a project
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    /// Project name
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Lifecycle status (ACTIVE for new projects)
    pub status: ProjectStatus,

    /// Planned start
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,

    /// Planned end
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl ProjectInput {
    /// Starts a new input with the given name and default status
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        ProjectInput {
            name: name.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Sets the status
    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }
}

impl From<&Project> for ProjectInput {
    /// Pre-fills an edit form from an existing project
    fn from(project: &Project) -> Self {
        ProjectInput {
            name: project.name.clone(),
            description: project.description.clone().unwrap_or_default(),
            status: project.status,
            start_date: project.start_date,
            end_date: project.end_date,
        }
    }
}
