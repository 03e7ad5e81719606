//! Task records
//!
//! Tasks belong to at most one project and are assigned to at most one user.
//! Both links are weak references: the task holds the referenced ID plus
//! whatever display fields the backend chose to embed, never the entity.
//!
//! # Status
//!
//! ```text
//! TODO → IN_PROGRESS → IN_REVIEW → COMPLETED
//!   └──────────────┴───────────┴─> CANCELLED
//! ```
//!
//! The client does not enforce transitions; the arrows only show the usual flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use super::{timestamp, user::UserRef, RecordId};

/// Task workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started (default for new tasks)
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Waiting for review
    InReview,

    /// Done
    Completed,

    /// Dropped
    Cancelled,
}

impl TaskStatus {
    /// Every status, in display order
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::InReview,
        TaskStatus::Completed,
        TaskStatus::Cancelled,
    ];

    /// Wire name, also the path segment of `/api/tasks/status/{status}`
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::InReview => "IN_REVIEW",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Cancelled => "CANCELLED",
        }
    }

    /// Whether the task counts as done on the dashboard
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskStatus::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| format!("Unknown task status: {}", s))
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,

    /// Default for new tasks
    #[default]
    Medium,

    High,

    Urgent,
}

impl TaskPriority {
    /// Every priority, lowest first
    pub const ALL: [TaskPriority; 4] = [
        TaskPriority::Low,
        TaskPriority::Medium,
        TaskPriority::High,
        TaskPriority::Urgent,
    ];

    /// Wire name, also the path segment of `/api/tasks/priority/{priority}`
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "LOW",
            TaskPriority::Medium => "MEDIUM",
            TaskPriority::High => "HIGH",
            TaskPriority::Urgent => "URGENT",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        TaskPriority::ALL
            .into_iter()
            .find(|priority| priority.as_str() == normalized)
            .ok_or_else(|| format!("Unknown task priority: {}", s))
    }
}

/// Weak reference to the project a task belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    /// Project ID
    pub id: RecordId,

    /// Project name, when embedded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ProjectRef {
    /// Reference carrying only the ID (what forms send back)
    pub fn id_only(id: RecordId) -> Self {
        ProjectRef { id, name: None }
    }

    /// Best available label for tables
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{}", self.id))
    }
}

/// Task as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Backend-assigned ID
    pub id: RecordId,

    /// Short title
    pub title: String,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Owning project
    #[serde(default)]
    pub project: Option<ProjectRef>,

    /// Assigned user
    #[serde(default)]
    pub assignee: Option<UserRef>,

    /// Due date
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// When the backend stored the task
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Input for creating or updating a task
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    /// Short title
    #[validate(length(min = 1, message = "Task title is required"))]
    pub title: String,

    /// Free-form description
    pub description: String,

    /// Workflow status (TODO for new tasks)
    pub status: TaskStatus,

    /// Priority (MEDIUM for new tasks)
    pub priority: TaskPriority,

    /// Owning project, sent as `{"id": n}`
    pub project: Option<ProjectRef>,

    /// Assigned user, sent as `{"id": n}` or `null`
    pub assignee: Option<UserRef>,

    /// Due date
    #[serde(default, with = "timestamp::option", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl TaskInput {
    /// Starts a new input with default status and priority
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        TaskInput {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    /// Sets the status
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the priority
    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Links the task to a project
    pub fn in_project(mut self, project_id: RecordId) -> Self {
        self.project = Some(ProjectRef::id_only(project_id));
        self
    }

    /// Assigns the task to a user
    pub fn assigned_to(mut self, user_id: RecordId) -> Self {
        self.assignee = Some(UserRef::id_only(user_id));
        self
    }
}

impl From<&Task> for TaskInput {
    /// Pre-fills an edit form from an existing task, keeping only reference IDs
    fn from(task: &Task) -> Self {
        TaskInput {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status: task.status,
            priority: task.priority,
            project: task.project.as_ref().map(|p| ProjectRef::id_only(p.id)),
            assignee: task.assignee.as_ref().map(|u| UserRef::id_only(u.id)),
            due_date: task.due_date,
        }
    }
}
