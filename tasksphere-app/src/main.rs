//! # TaskSphere CLI
//!
//! Command-line front end for the TaskSphere backend.
//!
//! ## Usage
//!
//! ```bash
//! tasksphere login alice --password secret
//! tasksphere dashboard
//! tasksphere tasks assigned
//! tasksphere projects create "Launch" --description "Q1 launch"
//! ```

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tasksphere_app::{
    app::AppState,
    config::Config,
    routes::{navigate, Navigation, Route},
    views::{self, auth, dashboard, profile, projects, tasks},
};
use tasksphere_shared::models::{
    project::{ProjectInput, ProjectStatus},
    task::{TaskInput, TaskPriority, TaskStatus},
    timestamp,
    user::RegisterRequest,
    RecordId,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// TaskSphere - projects and tasks from the terminal
#[derive(Parser)]
#[command(name = "tasksphere")]
#[command(about = "TaskSphere - projects and tasks from the terminal")]
#[command(version)]
struct Cli {
    /// Backend base URL (overrides TASKSPHERE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        username: String,
        #[arg(short, long)]
        password: String,
    },
    /// Create an account
    Register {
        username: String,
        email: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Forget the session
    Logout,
    /// Show the signed-in profile
    Whoami,
    /// Counters and recent items
    Dashboard,
    /// Open a view by path (/dashboard, /projects, /tasks, /profile)
    Open { path: String },
    /// Project commands
    #[command(subcommand)]
    Projects(ProjectCommand),
    /// Task commands
    #[command(subcommand)]
    Tasks(TaskCommand),
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// All projects
    List,
    /// My projects
    Mine,
    /// One project
    Show { id: RecordId },
    /// Create a project
    Create {
        name: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "ACTIVE")]
        status: ProjectStatus,
    },
    /// Update a project
    Update {
        id: RecordId,
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        status: Option<ProjectStatus>,
    },
    /// Delete a project
    Delete { id: RecordId },
    /// Search projects by name
    Search { name: String },
    /// Projects with a status
    Status { status: ProjectStatus },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Tasks I created
    Mine,
    /// Tasks assigned to me
    Assigned,
    /// All tasks
    All,
    /// One task
    Show { id: RecordId },
    /// Create a task
    Create {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long, default_value = "TODO")]
        status: TaskStatus,
        #[arg(short, long, default_value = "MEDIUM")]
        priority: TaskPriority,
        #[arg(long)]
        project: Option<RecordId>,
        #[arg(long)]
        assignee: Option<RecordId>,
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },
    /// Update a task
    Update {
        id: RecordId,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        status: Option<TaskStatus>,
        #[arg(short, long)]
        priority: Option<TaskPriority>,
        #[arg(long)]
        project: Option<RecordId>,
        #[arg(long)]
        assignee: Option<RecordId>,
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },
    /// Delete a task
    Delete { id: RecordId },
    /// Search tasks by title or description
    Search { term: String },
    /// Tasks with a status
    Status { status: TaskStatus },
    /// Tasks with a priority
    Priority { priority: TaskPriority },
    /// Tasks of a project
    Project { id: RecordId },
    /// Tasks assigned to a user
    Assignee { id: RecordId },
}

fn parse_due(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    timestamp::parse(raw).ok_or_else(|| format!("Invalid date: {}", raw))
}

fn init_tracing(config: &Config, verbose: u8) {
    let fallback = match verbose {
        0 => "tasksphere_app=info,tasksphere_client=info",
        1 => "tasksphere_app=debug,tasksphere_client=debug",
        _ => "tasksphere_app=trace,tasksphere_client=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| fallback.into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config.api.base_url = url.trim_end_matches('/').to_string();
    }

    init_tracing(&config, cli.verbose);
    tracing::debug!("TaskSphere CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let state = AppState::from_config(config)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, cancelling");
            on_signal.cancel();
        }
    });

    if let Err(e) = state.session.initialize(&cancel).await {
        tracing::debug!(error = %e, "Stored session was not restored");
    }

    let output = run(&state, cli.command, &cancel).await?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

async fn run(state: &AppState, command: Commands, cancel: &CancellationToken) -> Result<String> {
    match command {
        Commands::Login { username, password } => {
            let next = auth::login(state, &username, &password, cancel).await?;
            let name = state
                .session
                .user()
                .map(|u| u.display_name().to_string())
                .unwrap_or(username);
            Ok(format!("Logged in as {}. Next: {}", name, next))
        }
        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            let request = RegisterRequest {
                username,
                email,
                password,
                first_name,
                last_name,
            };
            let next = auth::register(state, &request, cancel).await?;
            Ok(format!("Account created. Log in at {}", next))
        }
        Commands::Logout => {
            let next = auth::logout(state);
            Ok(format!("Logged out. Next: {}", next))
        }
        Commands::Open { path } => Ok(views::open(state, &path, cancel).await?),
        Commands::Whoami => {
            require(state, Route::Profile)?;
            Ok(profile::render(state))
        }
        Commands::Dashboard => {
            require(state, Route::Dashboard)?;
            dashboard::load(state, cancel).await?;
            Ok(dashboard::render(state))
        }
        Commands::Projects(command) => {
            require(state, Route::Projects)?;
            run_projects(state, command, cancel).await
        }
        Commands::Tasks(command) => {
            require(state, Route::Tasks)?;
            run_tasks(state, command, cancel).await
        }
    }
}

/// Applies the route guard; anything but a render is an error for the CLI
fn require(state: &AppState, route: Route) -> Result<()> {
    match navigate(&state.session.snapshot(), route.path()) {
        Navigation::Render(_) => Ok(()),
        Navigation::Loading(_) => anyhow::bail!("Session is still being validated"),
        Navigation::Redirect { to, .. } => {
            anyhow::bail!("Not logged in. Run `tasksphere login <username> --password <password>` ({})", to)
        }
    }
}

async fn run_projects(state: &AppState, command: ProjectCommand, cancel: &CancellationToken) -> Result<String> {
    match command {
        ProjectCommand::List => {
            state.projects.fetch_projects(cancel).await?;
        }
        ProjectCommand::Mine => projects::load(state, cancel).await?,
        ProjectCommand::Search { name } => projects::search(state, &name, cancel).await?,
        ProjectCommand::Status { status } => projects::filter(state, status, cancel).await?,
        ProjectCommand::Show { id } => {
            let project = state.projects.get_project(id, cancel).await?;
            return Ok(projects::render_detail(&project));
        }
        ProjectCommand::Create {
            name,
            description,
            status,
        } => {
            let input = ProjectInput::new(name, description).with_status(status);
            let project = projects::submit(state, None, &input, cancel).await?;
            return Ok(format!("Created project #{}\n\n{}", project.id, projects::render_detail(&project)));
        }
        ProjectCommand::Update {
            id,
            name,
            description,
            status,
        } => {
            let current = match state.projects.find(id) {
                Some(p) => p,
                None => {
                    state.projects.fetch_projects(cancel).await?;
                    state
                        .projects
                        .find(id)
                        .ok_or_else(|| anyhow::anyhow!("Project #{} not found", id))?
                }
            };

            let mut input = ProjectInput::from(&current);
            if let Some(name) = name {
                input.name = name;
            }
            if let Some(description) = description {
                input.description = description;
            }
            if let Some(status) = status {
                input.status = status;
            }

            let project = projects::submit(state, Some(id), &input, cancel).await?;
            return Ok(format!("Updated project #{}\n\n{}", project.id, projects::render_detail(&project)));
        }
        ProjectCommand::Delete { id } => {
            projects::delete(state, id, cancel).await?;
            return Ok(format!("Deleted project #{}", id));
        }
    }

    Ok(projects::render(state))
}

async fn run_tasks(state: &AppState, command: TaskCommand, cancel: &CancellationToken) -> Result<String> {
    let mut tab = tasks::TaskTab::Mine;

    match command {
        TaskCommand::Mine => tasks::load(state, tasks::TaskTab::Mine, cancel).await?,
        TaskCommand::Assigned => {
            tab = tasks::TaskTab::AssignedToMe;
            tasks::load(state, tab, cancel).await?
        }
        TaskCommand::All => state.tasks.fetch_tasks(cancel).await?,
        TaskCommand::Search { term } => tasks::search(state, &term, cancel).await?,
        TaskCommand::Status { status } => tasks::filter_by_status(state, status, cancel).await?,
        TaskCommand::Priority { priority } => tasks::filter_by_priority(state, priority, cancel).await?,
        TaskCommand::Project { id } => state.tasks.fetch_tasks_by_project(id, cancel).await?,
        TaskCommand::Assignee { id } => state.tasks.fetch_tasks_by_assignee(id, cancel).await?,
        TaskCommand::Show { id } => {
            let task = state.tasks.get_task(id, cancel).await?;
            return Ok(tasks::render_detail(&task));
        }
        TaskCommand::Create {
            title,
            description,
            status,
            priority,
            project,
            assignee,
            due,
        } => {
            let mut input = TaskInput::new(title, description)
                .with_status(status)
                .with_priority(priority);
            if let Some(project) = project {
                input = input.in_project(project);
            }
            if let Some(assignee) = assignee {
                input = input.assigned_to(assignee);
            }
            input.due_date = due;

            let task = tasks::submit(state, None, &input, cancel).await?;
            return Ok(format!("Created task #{}\n\n{}", task.id, tasks::render_detail(&task)));
        }
        TaskCommand::Update {
            id,
            title,
            description,
            status,
            priority,
            project,
            assignee,
            due,
        } => {
            let current = match state.tasks.find(id) {
                Some(t) => t,
                None => {
                    state.tasks.fetch_tasks(cancel).await?;
                    state
                        .tasks
                        .find(id)
                        .ok_or_else(|| anyhow::anyhow!("Task #{} not found", id))?
                }
            };

            let mut input = TaskInput::from(&current);
            if let Some(title) = title {
                input.title = title;
            }
            if let Some(description) = description {
                input.description = description;
            }
            if let Some(status) = status {
                input.status = status;
            }
            if let Some(priority) = priority {
                input.priority = priority;
            }
            if let Some(project) = project {
                input = input.in_project(project);
            }
            if let Some(assignee) = assignee {
                input = input.assigned_to(assignee);
            }
            if due.is_some() {
                input.due_date = due;
            }

            let task = tasks::submit(state, Some(id), &input, cancel).await?;
            return Ok(format!("Updated task #{}\n\n{}", task.id, tasks::render_detail(&task)));
        }
        TaskCommand::Delete { id } => {
            tasks::delete(state, id, cancel).await?;
            return Ok(format!("Deleted task #{}", id));
        }
    }

    Ok(tasks::render(state, tab))
}
