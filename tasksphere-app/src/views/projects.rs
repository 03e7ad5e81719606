//! Projects view
//!
//! Table of the caller's projects plus the create/edit/delete actions.

use tasksphere_shared::models::project::{Project, ProjectInput, ProjectStatus};
use tasksphere_shared::models::RecordId;
use tokio_util::sync::CancellationToken;

use super::format::{cell, chip, format_date, project_status_color, Table};
use super::LOADING_TEXT;
use crate::app::AppState;
use crate::error::{ActionContext, AppError, AppResult};

/// Loads the caller's projects
pub async fn load(state: &AppState, cancel: &CancellationToken) -> AppResult<()> {
    state
        .projects
        .fetch_my_projects(cancel)
        .await
        .or_banner("Failed to load projects")
}

pub async fn search(state: &AppState, name: &str, cancel: &CancellationToken) -> AppResult<()> {
    state
        .projects
        .search_projects(name, cancel)
        .await
        .or_banner("Failed to search projects")
}

pub async fn filter(state: &AppState, status: ProjectStatus, cancel: &CancellationToken) -> AppResult<()> {
    state
        .projects
        .filter_projects_by_status(status, cancel)
        .await
        .or_banner("Failed to filter projects")
}

/// Saves the project form: creates when `editing` is `None`, updates otherwise
pub async fn submit(
    state: &AppState,
    editing: Option<RecordId>,
    input: &ProjectInput,
    cancel: &CancellationToken,
) -> AppResult<Project> {
    if input.name.trim().is_empty() {
        return Err(AppError::InvalidInput("Project name is required".to_string()));
    }

    match editing {
        None => state
            .projects
            .create_project(input, cancel)
            .await
            .or_banner("Failed to create project"),
        Some(id) => state
            .projects
            .update_project(id, input, cancel)
            .await
            .or_banner("Failed to update project"),
    }
}

pub async fn delete(state: &AppState, id: RecordId, cancel: &CancellationToken) -> AppResult<()> {
    state
        .projects
        .delete_project(id, cancel)
        .await
        .or_banner("Failed to delete project")
}

/// Renders a project table
pub fn render_table(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found\nCreate your first project to get started!".to_string();
    }

    let mut table = Table::new(["ID", "Name", "Description", "Status", "Created"]);
    for project in projects {
        table.push_row(vec![
            project.id.to_string(),
            project.name.clone(),
            cell(project.description.as_deref()),
            chip(project.status.as_str(), project_status_color(project.status)),
            format_date(project.created_at),
        ]);
    }
    table.render()
}

/// One project in detail
pub fn render_detail(project: &Project) -> String {
    let mut out = vec![
        format!("{} (#{})", project.name, project.id),
        format!(
            "Status:      {}",
            chip(project.status.as_str(), project_status_color(project.status))
        ),
        format!("Description: {}", cell(project.description.as_deref())),
        format!("Start:       {}", format_date(project.start_date)),
        format!("End:         {}", format_date(project.end_date)),
        format!("Created:     {}", format_date(project.created_at)),
    ];

    if let Some(owner) = &project.created_by {
        out.push(format!("Owner:       {}", owner.label()));
    }

    out.join("\n")
}

/// Current projects view text
pub fn render(state: &AppState) -> String {
    if state.projects.is_loading() {
        return LOADING_TEXT.to_string();
    }
    format!("Projects\n\n{}", render_table(&state.projects.projects()))
}
