//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - An in-memory TaskSphere backend served by axum on an ephemeral port
//! - Application state wired to it through the real reqwest transport
//! - A temporary directory for the persisted session token

#![allow(dead_code)]

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tasksphere_app::{app::AppState, config::Config};
use tasksphere_client::transport::ReqwestTransport;
use tasksphere_shared::auth::token_store::FileTokenStore;
use tempfile::TempDir;

pub const PASSWORD: &str = "secret";

/// Registered account
#[derive(Debug, Clone)]
struct Account {
    id: i64,
    username: String,
    password: String,
    first_name: String,
    last_name: String,
    email: String,
}

impl Account {
    fn token(&self) -> String {
        format!("token-{}", self.username)
    }

    fn profile(&self) -> Value {
        json!({
            "id": self.id,
            "username": self.username,
            "role": "USER",
            "firstName": self.first_name,
            "lastName": self.last_name,
            "email": self.email,
        })
    }

    fn reference(&self) -> Value {
        json!({"id": self.id, "username": self.username})
    }
}

#[derive(Default)]
struct Data {
    next_id: i64,
    accounts: Vec<Account>,
    /// (creator id, record)
    projects: Vec<(i64, Value)>,
    tasks: Vec<(i64, Value)>,
}

impl Data {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Request seen by the backend
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

/// In-memory backend
#[derive(Default)]
pub struct Backend {
    data: Mutex<Data>,
    seen: Mutex<Vec<SeenRequest>>,

    /// Answer every task update with 500
    pub fail_task_updates: AtomicBool,
}

impl Backend {
    fn new() -> Self {
        let backend = Backend::default();
        {
            let mut data = backend.data.lock().unwrap();
            let id = data.next_id();
            data.accounts.push(Account {
                id,
                username: "alice".to_string(),
                password: PASSWORD.to_string(),
                first_name: "Alice".to_string(),
                last_name: "Liddell".to_string(),
                email: "alice@example.com".to_string(),
            });
        }
        backend
    }

    /// Requests received so far
    pub fn seen(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }

    /// Requests received for one path
    pub fn seen_for(&self, method: &str, path: &str) -> Vec<SeenRequest> {
        self.seen()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Seeds a task owned by `creator` and optionally assigned to `assignee`
    pub fn seed_task(&self, creator: &str, title: &str, status: &str, assignee: Option<&str>) -> i64 {
        let mut data = self.data.lock().unwrap();
        let creator = account(&data, creator).expect("unknown creator");
        let assignee = assignee.and_then(|name| account(&data, name));
        let id = data.next_id();
        data.tasks.push((
            creator.id,
            json!({
                "id": id,
                "title": title,
                "description": "",
                "status": status,
                "priority": "MEDIUM",
                "project": null,
                "assignee": assignee.map(|a| a.reference()),
                "dueDate": null,
                "createdAt": "2024-01-15T10:30:00",
            }),
        ));
        id
    }

    /// Adds an account
    pub fn add_account(&self, username: &str) {
        let mut data = self.data.lock().unwrap();
        let id = data.next_id();
        data.accounts.push(Account {
            id,
            username: username.to_string(),
            password: PASSWORD.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: format!("{}@example.com", username),
        });
    }
}

fn account(data: &Data, username: &str) -> Option<Account> {
    data.accounts.iter().find(|a| a.username == username).cloned()
}

type Shared = Arc<Backend>;

fn caller(backend: &Backend, headers: &HeaderMap) -> Option<Account> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .to_string();

    let data = backend.data.lock().unwrap();
    data.accounts.iter().find(|a| a.token() == token).cloned()
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, "").into_response()
}

async fn record(State(backend): State<Shared>, request: Request, next: Next) -> Response {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    backend.seen.lock().unwrap().push(SeenRequest {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization,
    });

    next.run(request).await
}

async fn login(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let data = backend.data.lock().unwrap();
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    match data
        .accounts
        .iter()
        .find(|a| a.username == username && a.password == password)
    {
        Some(a) => Json(json!({"token": a.token(), "username": a.username, "role": "USER"})).into_response(),
        None => (StatusCode::BAD_REQUEST, "Invalid username or password").into_response(),
    }
}

async fn register(State(backend): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut data = backend.data.lock().unwrap();
    let username = body["username"].as_str().unwrap_or_default().to_string();

    if data.accounts.iter().any(|a| a.username == username) {
        return (StatusCode::BAD_REQUEST, "Username is already taken!").into_response();
    }

    let id = data.next_id();
    data.accounts.push(Account {
        id,
        username,
        password: body["password"].as_str().unwrap_or_default().to_string(),
        first_name: body["firstName"].as_str().unwrap_or_default().to_string(),
        last_name: body["lastName"].as_str().unwrap_or_default().to_string(),
        email: body["email"].as_str().unwrap_or_default().to_string(),
    });

    (StatusCode::OK, "User registered successfully!").into_response()
}

async fn profile(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    match caller(&backend, &headers) {
        Some(a) => Json(a.profile()).into_response(),
        None => unauthorized(),
    }
}

async fn all_projects(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    if caller(&backend, &headers).is_none() {
        return unauthorized();
    }
    let data = backend.data.lock().unwrap();
    Json(data.projects.iter().map(|(_, p)| p.clone()).collect::<Vec<_>>()).into_response()
}

async fn my_projects(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let Some(me) = caller(&backend, &headers) else {
        return unauthorized();
    };
    let data = backend.data.lock().unwrap();
    let mine: Vec<Value> = data
        .projects
        .iter()
        .filter(|(owner, _)| *owner == me.id)
        .map(|(_, p)| p.clone())
        .collect();
    Json(mine).into_response()
}

async fn create_project(State(backend): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let Some(me) = caller(&backend, &headers) else {
        return unauthorized();
    };
    let mut data = backend.data.lock().unwrap();
    let id = data.next_id();
    let project = json!({
        "id": id,
        "name": body["name"],
        "description": body["description"],
        "status": body["status"],
        "createdAt": "2024-01-15T10:30:00",
        "createdBy": me.reference(),
    });
    data.projects.push((me.id, project.clone()));
    Json(project).into_response()
}

async fn update_project(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if caller(&backend, &headers).is_none() {
        return unauthorized();
    }
    let mut data = backend.data.lock().unwrap();
    match data.projects.iter_mut().find(|(_, p)| p["id"] == id) {
        Some((_, project)) => {
            for key in ["name", "description", "status"] {
                project[key] = body[key].clone();
            }
            Json(project.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "").into_response(),
    }
}

async fn delete_project(State(backend): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if caller(&backend, &headers).is_none() {
        return unauthorized();
    }
    let mut data = backend.data.lock().unwrap();
    let before = data.projects.len();
    data.projects.retain(|(_, p)| p["id"] != id);
    if data.projects.len() == before {
        (StatusCode::NOT_FOUND, "").into_response()
    } else {
        (StatusCode::OK, "Project deleted successfully").into_response()
    }
}

async fn search_projects(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if caller(&backend, &headers).is_none() {
        return unauthorized();
    }
    let needle = query.get("name").cloned().unwrap_or_default().to_lowercase();
    let data = backend.data.lock().unwrap();
    let found: Vec<Value> = data
        .projects
        .iter()
        .map(|(_, p)| p)
        .filter(|p| p["name"].as_str().unwrap_or_default().to_lowercase().contains(&needle))
        .cloned()
        .collect();
    Json(found).into_response()
}

async fn my_tasks(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let Some(me) = caller(&backend, &headers) else {
        return unauthorized();
    };
    let data = backend.data.lock().unwrap();
    let mine: Vec<Value> = data
        .tasks
        .iter()
        .filter(|(creator, _)| *creator == me.id)
        .map(|(_, t)| t.clone())
        .collect();
    Json(mine).into_response()
}

async fn assigned_tasks(State(backend): State<Shared>, headers: HeaderMap) -> Response {
    let Some(me) = caller(&backend, &headers) else {
        return unauthorized();
    };
    let data = backend.data.lock().unwrap();
    let assigned: Vec<Value> = data
        .tasks
        .iter()
        .map(|(_, t)| t)
        .filter(|t| t["assignee"]["id"] == me.id)
        .cloned()
        .collect();
    Json(assigned).into_response()
}

async fn create_task(State(backend): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let Some(me) = caller(&backend, &headers) else {
        return unauthorized();
    };
    let mut data = backend.data.lock().unwrap();
    let id = data.next_id();
    let task = json!({
        "id": id,
        "title": body["title"],
        "description": body["description"],
        "status": body["status"],
        "priority": body["priority"],
        "project": body["project"],
        "assignee": body["assignee"],
        "dueDate": body.get("dueDate").cloned().unwrap_or(Value::Null),
        "createdAt": "2024-01-15T10:30:00",
    });
    data.tasks.push((me.id, task.clone()));
    Json(task).into_response()
}

async fn update_task(
    State(backend): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if caller(&backend, &headers).is_none() {
        return unauthorized();
    }
    if backend.fail_task_updates.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "").into_response();
    }
    let mut data = backend.data.lock().unwrap();
    match data.tasks.iter_mut().find(|(_, t)| t["id"] == id) {
        Some((_, task)) => {
            for key in ["title", "description", "status", "priority", "project", "assignee"] {
                task[key] = body[key].clone();
            }
            Json(task.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "").into_response(),
    }
}

async fn delete_task(State(backend): State<Shared>, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    if caller(&backend, &headers).is_none() {
        return unauthorized();
    }
    let mut data = backend.data.lock().unwrap();
    let before = data.tasks.len();
    data.tasks.retain(|(_, t)| t["id"] != id);
    if data.tasks.len() == before {
        (StatusCode::NOT_FOUND, "").into_response()
    } else {
        (StatusCode::OK, "Task deleted successfully").into_response()
    }
}

fn router(backend: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/users/profile", get(profile))
        .route("/api/projects", get(all_projects).post(create_project))
        .route("/api/projects/my-projects", get(my_projects))
        .route("/api/projects/search", get(search_projects))
        .route("/api/projects/:id", put(update_project).delete(delete_project))
        .route("/api/tasks/my-tasks", get(my_tasks))
        .route("/api/tasks/assigned-to-me", get(assigned_tasks))
        .route("/api/tasks", post(create_task))
        .route("/api/tasks/:id", put(update_task).delete(delete_task))
        .layer(middleware::from_fn_with_state(backend.clone(), record))
        .with_state(backend)
}

/// Test context containing all necessary resources
pub struct TestContext {
    pub backend: Arc<Backend>,
    pub base_url: String,
    pub token_dir: TempDir,
    pub state: AppState,
}

impl TestContext {
    /// Starts a fresh backend and builds application state against it
    pub async fn new() -> anyhow::Result<Self> {
        let backend = Arc::new(Backend::new());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let app = router(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let token_dir = tempfile::tempdir()?;
        let state = build_state(&base_url, &token_dir.path().join("token"))?;

        Ok(Self {
            backend,
            base_url,
            token_dir,
            state,
        })
    }

    /// Path of the persisted token file
    pub fn token_path(&self) -> PathBuf {
        self.token_dir.path().join("token")
    }

    /// A second application instance sharing the token file, as after a restart
    pub fn restart(&self) -> anyhow::Result<AppState> {
        build_state(&self.base_url, &self.token_path())
    }
}

fn build_state(base_url: &str, token_path: &std::path::Path) -> anyhow::Result<AppState> {
    let url = base_url.to_string();
    let config = Config::from_lookup(|key| match key {
        "TASKSPHERE_API_URL" => Some(url.clone()),
        _ => None,
    })?;

    let transport = ReqwestTransport::new(base_url, Duration::from_secs(5))?;
    let tokens = FileTokenStore::new(token_path);

    Ok(AppState::new(config, Arc::new(transport), Arc::new(tokens)))
}
