//! Task store
//!
//! Typed layer over [`ResourceStore`] for `/api/tasks`. Besides plain CRUD
//! the backend offers several views of the task list; each of them replaces
//! the current collection:
//!
//! ```text
//! GET /api/tasks                    everything visible
//! GET /api/tasks/my-tasks           created by the caller
//! GET /api/tasks/assigned-to-me     assigned to the caller
//! GET /api/tasks/search?searchTerm  title/description match
//! GET /api/tasks/status/{status}
//! GET /api/tasks/priority/{priority}
//! GET /api/tasks/project/{id}
//! GET /api/tasks/assignee/{id}
//! ```

use tasksphere_shared::models::task::{Task, TaskInput, TaskPriority, TaskStatus};
use tasksphere_shared::models::RecordId;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::{Resource, ResourceStore, StoreState};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::ApiRequest;

impl Resource for Task {
    const KIND: &'static str = "task";
    const COLLECTION_PATH: &'static str = "/api/tasks";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Holds the current task collection
pub struct TaskStore {
    inner: ResourceStore<Task>,
}

impl TaskStore {
    pub fn new(api: ApiClient) -> Self {
        TaskStore {
            inner: ResourceStore::new(api),
        }
    }

    async fn replace(&self, path: String, action: &str, cancel: &CancellationToken) -> ClientResult<()> {
        self.inner
            .replace_with(ApiRequest::get(path), action, cancel)
            .await
    }

    pub async fn fetch_tasks(&self, cancel: &CancellationToken) -> ClientResult<()> {
        self.replace("/api/tasks".to_string(), "fetching tasks", cancel)
            .await
    }

    /// Tasks the caller created
    pub async fn fetch_my_tasks(&self, cancel: &CancellationToken) -> ClientResult<()> {
        self.replace("/api/tasks/my-tasks".to_string(), "fetching my tasks", cancel)
            .await
    }

    /// Tasks assigned to the caller
    pub async fn fetch_assigned_tasks(&self, cancel: &CancellationToken) -> ClientResult<()> {
        self.replace(
            "/api/tasks/assigned-to-me".to_string(),
            "fetching assigned tasks",
            cancel,
        )
        .await
    }

    pub async fn fetch_tasks_by_project(
        &self,
        project_id: RecordId,
        cancel: &CancellationToken,
    ) -> ClientResult<()> {
        self.replace(
            format!("/api/tasks/project/{}", project_id),
            "fetching project tasks",
            cancel,
        )
        .await
    }

    pub async fn fetch_tasks_by_assignee(
        &self,
        user_id: RecordId,
        cancel: &CancellationToken,
    ) -> ClientResult<()> {
        self.replace(
            format!("/api/tasks/assignee/{}", user_id),
            "fetching assignee tasks",
            cancel,
        )
        .await
    }

    /// One task by id; the collection is left alone
    pub async fn get_task(&self, id: RecordId, cancel: &CancellationToken) -> ClientResult<Task> {
        self.inner.get(id, cancel).await
    }

    pub async fn create_task(&self, input: &TaskInput, cancel: &CancellationToken) -> ClientResult<Task> {
        self.inner.create(input, cancel).await
    }

    pub async fn update_task(
        &self,
        id: RecordId,
        input: &TaskInput,
        cancel: &CancellationToken,
    ) -> ClientResult<Task> {
        self.inner.update(id, input, cancel).await
    }

    pub async fn delete_task(&self, id: RecordId, cancel: &CancellationToken) -> ClientResult<()> {
        self.inner.delete(id, cancel).await
    }

    pub async fn search_tasks(&self, term: &str, cancel: &CancellationToken) -> ClientResult<()> {
        let request = ApiRequest::get("/api/tasks/search").with_query("searchTerm", term);
        self.inner
            .replace_with(request, "searching tasks", cancel)
            .await
    }

    pub async fn filter_tasks_by_status(
        &self,
        status: TaskStatus,
        cancel: &CancellationToken,
    ) -> ClientResult<()> {
        self.replace(
            format!("/api/tasks/status/{}", status.as_str()),
            "filtering tasks by status",
            cancel,
        )
        .await
    }

    pub async fn filter_tasks_by_priority(
        &self,
        priority: TaskPriority,
        cancel: &CancellationToken,
    ) -> ClientResult<()> {
        self.replace(
            format!("/api/tasks/priority/{}", priority.as_str()),
            "filtering tasks by priority",
            cancel,
        )
        .await
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.inner.items()
    }

    pub fn find(&self, id: RecordId) -> Option<Task> {
        self.inner.find(id)
    }

    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    pub fn snapshot(&self) -> StoreState<Task> {
        self.inner.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<Task>> {
        self.inner.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::transport::{HttpMethod, StubTransport};
    use serde_json::json;
    use std::sync::Arc;
    use tasksphere_shared::auth::credentials::StaticCredentials;

    fn store() -> (Arc<StubTransport>, TaskStore) {
        let stub = Arc::new(StubTransport::new());
        let api = ApiClient::new(stub.clone(), Arc::new(StaticCredentials::new("tok")));
        (stub, TaskStore::new(api))
    }

    fn task(id: RecordId, title: &str, status: &str, priority: &str) -> serde_json::Value {
        json!({
            "id": id,
            "title": title,
            "description": "",
            "status": status,
            "priority": priority,
            "project": {"id": 1, "name": "Apollo"},
            "assignee": null,
            "dueDate": "2024-03-01T00:00:00"
        })
    }

    fn ids(store: &TaskStore) -> Vec<RecordId> {
        store.tasks().iter().map(|t| t.id).collect()
    }

    #[tokio::test]
    async fn test_tab_switch_replaces_collection() {
        let (stub, store) = store();
        let cancel = CancellationToken::new();

        stub.respond_json(
            HttpMethod::Get,
            "/api/tasks/my-tasks",
            200,
            json!([task(1, "Mine", "TODO", "LOW"), task(2, "Also mine", "TODO", "LOW")]),
        )
        .await;
        stub.respond_json(
            HttpMethod::Get,
            "/api/tasks/assigned-to-me",
            200,
            json!([task(7, "Theirs", "IN_PROGRESS", "HIGH")]),
        )
        .await;

        store.fetch_my_tasks(&cancel).await.unwrap();
        assert_eq!(ids(&store), vec![1, 2]);

        store.fetch_assigned_tasks(&cancel).await.unwrap();
        assert_eq!(ids(&store), vec![7]);
    }

    #[tokio::test]
    async fn test_search_sends_search_term() {
        let (stub, store) = store();
        stub.respond_json(HttpMethod::Get, "/api/tasks/search", 200, json!([])).await;

        store.search_tasks("deploy", &CancellationToken::new()).await.unwrap();

        let sent = stub.last_request().await.unwrap();
        assert_eq!(sent.query_param("searchTerm"), Some("deploy"));
    }

    #[tokio::test]
    async fn test_filters_use_wire_names() {
        let (stub, store) = store();
        let cancel = CancellationToken::new();
        stub.respond_json(
            HttpMethod::Get,
            "/api/tasks/status/IN_REVIEW",
            200,
            json!([task(3, "Review", "IN_REVIEW", "MEDIUM")]),
        )
        .await;
        stub.respond_json(
            HttpMethod::Get,
            "/api/tasks/priority/URGENT",
            200,
            json!([task(4, "Fire", "TODO", "URGENT")]),
        )
        .await;

        store
            .filter_tasks_by_status(TaskStatus::InReview, &cancel)
            .await
            .unwrap();
        assert_eq!(store.tasks()[0].status, TaskStatus::InReview);

        store
            .filter_tasks_by_priority(TaskPriority::Urgent, &cancel)
            .await
            .unwrap();
        assert_eq!(store.tasks()[0].priority, TaskPriority::Urgent);
    }

    #[tokio::test]
    async fn test_project_and_assignee_queries() {
        let (stub, store) = store();
        let cancel = CancellationToken::new();
        stub.respond_json(
            HttpMethod::Get,
            "/api/tasks/project/9",
            200,
            json!([task(5, "In nine", "TODO", "LOW")]),
        )
        .await;
        stub.respond_json(HttpMethod::Get, "/api/tasks/assignee/3", 200, json!([])).await;

        store.fetch_tasks_by_project(9, &cancel).await.unwrap();
        assert_eq!(ids(&store), vec![5]);

        store.fetch_tasks_by_assignee(3, &cancel).await.unwrap();
        assert!(store.tasks().is_empty());
    }

    #[tokio::test]
    async fn test_create_sends_reference_ids() {
        let (stub, store) = store();
        stub.respond_json(
            HttpMethod::Post,
            "/api/tasks",
            200,
            task(42, "Write docs", "TODO", "MEDIUM"),
        )
        .await;

        let input = TaskInput::new("Write docs", "").in_project(1).assigned_to(3);
        store.create_task(&input, &CancellationToken::new()).await.unwrap();

        let body = stub.last_request().await.unwrap().body.unwrap();
        assert_eq!(body["project"]["id"], 1);
        assert_eq!(body["assignee"]["id"], 3);
        assert_eq!(body["status"], "TODO");
        assert_eq!(body["priority"], "MEDIUM");
        assert_eq!(ids(&store), vec![42]);
    }

    #[tokio::test]
    async fn test_update_failure_keeps_collection() {
        let (stub, store) = store();
        let cancel = CancellationToken::new();
        stub.respond_json(
            HttpMethod::Get,
            "/api/tasks",
            200,
            json!([task(1, "One", "TODO", "LOW")]),
        )
        .await;
        stub.respond(HttpMethod::Put, "/api/tasks/1", 500, "").await;

        store.fetch_tasks(&cancel).await.unwrap();
        let before = store.tasks();

        let input = TaskInput::from(&before[0]).with_status(TaskStatus::Completed);
        let err = store.update_task(1, &input, &cancel).await.unwrap_err();

        assert_eq!(err.user_message("Failed to update task"), "Failed to update task");
        assert_eq!(store.tasks(), before);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (stub, store) = store();
        stub.respond(HttpMethod::Delete, "/api/tasks/8", 404, "").await;

        let result = store.delete_task(8, &CancellationToken::new()).await;
        assert!(matches!(result, Err(ClientError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_due_date_is_parsed() {
        let (stub, store) = store();
        stub.respond_json(HttpMethod::Get, "/api/tasks/2", 200, task(2, "Due", "TODO", "LOW"))
            .await;

        let fetched = store.get_task(2, &CancellationToken::new()).await.unwrap();
        assert_eq!(
            fetched.due_date.map(|d| d.format("%Y-%m-%d").to_string()),
            Some("2024-03-01".to_string())
        );
    }
}
