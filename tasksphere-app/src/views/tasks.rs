//! Tasks view
//!
//! Two tabs over the same task store: "My Tasks" (created by the caller) and
//! "Assigned to Me". Switching tabs refetches and replaces the collection.

use std::fmt;
use std::str::FromStr;

use tasksphere_shared::models::task::{Task, TaskInput, TaskPriority, TaskStatus};
use tasksphere_shared::models::RecordId;
use tokio_util::sync::CancellationToken;

use super::format::{cell, chip, format_date, priority_color, task_status_color, Table};
use super::LOADING_TEXT;
use crate::app::AppState;
use crate::error::{ActionContext, AppError, AppResult};

/// Task list tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskTab {
    #[default]
    Mine,
    AssignedToMe,
}

impl TaskTab {
    pub const ALL: [TaskTab; 2] = [TaskTab::Mine, TaskTab::AssignedToMe];

    pub fn label(&self) -> &'static str {
        match self {
            TaskTab::Mine => "My Tasks",
            TaskTab::AssignedToMe => "Assigned to Me",
        }
    }
}

impl fmt::Display for TaskTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mine" | "my" | "my tasks" => Ok(TaskTab::Mine),
            "assigned" | "assigned to me" => Ok(TaskTab::AssignedToMe),
            other => Err(format!("Unknown tab: {}", other)),
        }
    }
}

/// Loads the tab's task list (and the project list for the form selector)
pub async fn load(state: &AppState, tab: TaskTab, cancel: &CancellationToken) -> AppResult<()> {
    let tasks = async {
        match tab {
            TaskTab::Mine => state.tasks.fetch_my_tasks(cancel).await,
            TaskTab::AssignedToMe => state.tasks.fetch_assigned_tasks(cancel).await,
        }
    };

    let (tasks, projects) = futures::join!(tasks, state.projects.fetch_my_projects(cancel));

    tasks.or_banner("Failed to load tasks")?;
    if let Err(e) = projects {
        tracing::warn!(error = %e, "Project selector could not be loaded");
    }
    Ok(())
}

pub async fn search(state: &AppState, term: &str, cancel: &CancellationToken) -> AppResult<()> {
    state
        .tasks
        .search_tasks(term, cancel)
        .await
        .or_banner("Failed to search tasks")
}

pub async fn filter_by_status(
    state: &AppState,
    status: TaskStatus,
    cancel: &CancellationToken,
) -> AppResult<()> {
    state
        .tasks
        .filter_tasks_by_status(status, cancel)
        .await
        .or_banner("Failed to filter tasks")
}

pub async fn filter_by_priority(
    state: &AppState,
    priority: TaskPriority,
    cancel: &CancellationToken,
) -> AppResult<()> {
    state
        .tasks
        .filter_tasks_by_priority(priority, cancel)
        .await
        .or_banner("Failed to filter tasks")
}

/// Saves the task form: creates when `editing` is `None`, updates otherwise
pub async fn submit(
    state: &AppState,
    editing: Option<RecordId>,
    input: &TaskInput,
    cancel: &CancellationToken,
) -> AppResult<Task> {
    if input.title.trim().is_empty() {
        return Err(AppError::InvalidInput("Task title is required".to_string()));
    }

    match editing {
        None => state
            .tasks
            .create_task(input, cancel)
            .await
            .or_banner("Failed to create task"),
        Some(id) => state
            .tasks
            .update_task(id, input, cancel)
            .await
            .or_banner("Failed to update task"),
    }
}

pub async fn delete(state: &AppState, id: RecordId, cancel: &CancellationToken) -> AppResult<()> {
    state
        .tasks
        .delete_task(id, cancel)
        .await
        .or_banner("Failed to delete task")
}

/// Tab header with the active tab marked
pub fn render_tabs(active: TaskTab) -> String {
    TaskTab::ALL
        .iter()
        .map(|tab| {
            if *tab == active {
                format!("[{}]", tab.label())
            } else {
                format!(" {} ", tab.label())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn render_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found\nCreate your first task to get started!".to_string();
    }

    let mut table = Table::new(["ID", "Title", "Project", "Status", "Priority", "Assignee", "Due Date"]);
    for task in tasks {
        table.push_row(vec![
            task.id.to_string(),
            task.title.clone(),
            cell(task.project.as_ref().map(|p| p.label()).as_deref()),
            chip(task.status.as_str(), task_status_color(task.status)),
            chip(task.priority.as_str(), priority_color(task.priority)),
            cell(task.assignee.as_ref().map(|u| u.label()).as_deref()),
            format_date(task.due_date),
        ]);
    }
    table.render()
}

pub fn render_detail(task: &Task) -> String {
    [
        format!("{} (#{})", task.title, task.id),
        format!("Status:      {}", chip(task.status.as_str(), task_status_color(task.status))),
        format!("Priority:    {}", chip(task.priority.as_str(), priority_color(task.priority))),
        format!("Project:     {}", cell(task.project.as_ref().map(|p| p.label()).as_deref())),
        format!("Assignee:    {}", cell(task.assignee.as_ref().map(|u| u.label()).as_deref())),
        format!("Due:         {}", format_date(task.due_date)),
        format!("Description: {}", cell(task.description.as_deref())),
    ]
    .join("\n")
}

/// Current tasks view text
pub fn render(state: &AppState, tab: TaskTab) -> String {
    if state.tasks.is_loading() {
        return LOADING_TEXT.to_string();
    }
    format!(
        "Tasks\n{}\n\n{}",
        render_tabs(tab),
        render_table(&state.tasks.tasks())
    )
}
