//! Dashboard view
//!
//! Loads the caller's tasks and projects concurrently, then summarizes them:
//! four counters, the first five tasks and the first five projects.

use tasksphere_shared::models::project::{Project, ProjectStatus};
use tasksphere_shared::models::task::Task;
use tasksphere_shared::models::user::UserSummary;
use tokio_util::sync::CancellationToken;

use super::format::{chip, priority_color, project_status_color, task_status_color};
use super::LOADING_TEXT;
use crate::app::AppState;
use crate::error::{ActionContext, AppResult};

/// Entries shown in each "recent" list
pub const RECENT_LIMIT: usize = 5;

/// Derived dashboard figures
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub greeting: String,
    pub my_projects: usize,
    pub my_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub active_projects: usize,
    pub recent_tasks: Vec<Task>,
    pub recent_projects: Vec<Project>,
}

impl DashboardSummary {
    pub fn build(user: Option<&UserSummary>, projects: &[Project], tasks: &[Task]) -> Self {
        let completed_tasks = tasks.iter().filter(|t| t.status.is_completed()).count();
        let name = user.map(UserSummary::display_name).unwrap_or_default();

        DashboardSummary {
            greeting: format!("Welcome back, {}!", name),
            my_projects: projects.len(),
            my_tasks: tasks.len(),
            completed_tasks,
            pending_tasks: tasks.len() - completed_tasks,
            active_projects: projects
                .iter()
                .filter(|p| p.status == ProjectStatus::Active)
                .count(),
            recent_tasks: tasks.iter().take(RECENT_LIMIT).cloned().collect(),
            recent_projects: projects.iter().take(RECENT_LIMIT).cloned().collect(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = vec![
            self.greeting.clone(),
            String::new(),
            format!(
                "My Projects: {}   My Tasks: {}   Completed: {}   Pending: {}   Active Projects: {}",
                self.my_projects,
                self.my_tasks,
                self.completed_tasks,
                self.pending_tasks,
                self.active_projects
            ),
            String::new(),
            "Recent Tasks".to_string(),
        ];

        if self.recent_tasks.is_empty() {
            out.push("  No tasks found. Create your first task!".to_string());
        }
        for task in &self.recent_tasks {
            out.push(format!(
                "  {} {} {}",
                task.title,
                chip(task.status.as_str(), task_status_color(task.status)),
                chip(task.priority.as_str(), priority_color(task.priority)),
            ));
        }

        out.push(String::new());
        out.push("My Projects".to_string());

        if self.recent_projects.is_empty() {
            out.push("  No projects found. Create your first project!".to_string());
        }
        for project in &self.recent_projects {
            out.push(format!(
                "  {} {}",
                project.name,
                chip(project.status.as_str(), project_status_color(project.status)),
            ));
        }

        out.join("\n")
    }
}

/// Fetches my tasks and my projects concurrently
///
/// Both requests always run to completion; the first failure is returned.
pub async fn load(state: &AppState, cancel: &CancellationToken) -> AppResult<()> {
    let (tasks, projects) = futures::join!(
        state.tasks.fetch_my_tasks(cancel),
        state.projects.fetch_my_projects(cancel),
    );

    tasks.or_banner("Failed to load tasks")?;
    projects.or_banner("Failed to load projects")?;
    Ok(())
}

/// Current dashboard text
pub fn render(state: &AppState) -> String {
    if state.tasks.is_loading() || state.projects.is_loading() {
        return LOADING_TEXT.to_string();
    }

    let user = state.session.user();
    DashboardSummary::build(user.as_ref(), &state.projects.projects(), &state.tasks.tasks()).render()
}
