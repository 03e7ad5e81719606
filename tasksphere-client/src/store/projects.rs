//! Project store
//!
//! Thin typed layer over [`ResourceStore`] for `/api/projects`.

use tasksphere_shared::models::project::{Project, ProjectInput, ProjectStatus};
use tasksphere_shared::models::RecordId;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use super::{Resource, ResourceStore, StoreState};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::ApiRequest;

impl Resource for Project {
    const KIND: &'static str = "project";
    const COLLECTION_PATH: &'static str = "/api/projects";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Holds the current project collection
pub struct ProjectStore {
    inner: ResourceStore<Project>,
}

impl ProjectStore {
    pub fn new(api: ApiClient) -> Self {
        ProjectStore {
            inner: ResourceStore::new(api),
        }
    }

    /// All projects visible to the caller
    pub async fn fetch_projects(&self, cancel: &CancellationToken) -> ClientResult<()> {
        self.inner
            .replace_with(ApiRequest::get("/api/projects"), "fetching projects", cancel)
            .await
    }

    /// Projects the caller created or belongs to
    pub async fn fetch_my_projects(&self, cancel: &CancellationToken) -> ClientResult<()> {
        self.inner
            .replace_with(
                ApiRequest::get("/api/projects/my-projects"),
                "fetching my projects",
                cancel,
            )
            .await
    }

    /// One project by id; the collection is left alone
    pub async fn get_project(&self, id: RecordId, cancel: &CancellationToken) -> ClientResult<Project> {
        self.inner.get(id, cancel).await
    }

    pub async fn create_project(
        &self,
        input: &ProjectInput,
        cancel: &CancellationToken,
    ) -> ClientResult<Project> {
        self.inner.create(input, cancel).await
    }

    pub async fn update_project(
        &self,
        id: RecordId,
        input: &ProjectInput,
        cancel: &CancellationToken,
    ) -> ClientResult<Project> {
        self.inner.update(id, input, cancel).await
    }

    pub async fn delete_project(&self, id: RecordId, cancel: &CancellationToken) -> ClientResult<()> {
        self.inner.delete(id, cancel).await
    }

    /// Projects whose name matches `name`
    pub async fn search_projects(&self, name: &str, cancel: &CancellationToken) -> ClientResult<()> {
        let request = ApiRequest::get("/api/projects/search").with_query("name", name);
        self.inner
            .replace_with(request, "searching projects", cancel)
            .await
    }

    pub async fn filter_projects_by_status(
        &self,
        status: ProjectStatus,
        cancel: &CancellationToken,
    ) -> ClientResult<()> {
        let request = ApiRequest::get(format!("/api/projects/status/{}", status.as_str()));
        self.inner
            .replace_with(request, "filtering projects by status", cancel)
            .await
    }

    pub fn projects(&self) -> Vec<Project> {
        self.inner.items()
    }

    pub fn find(&self, id: RecordId) -> Option<Project> {
        self.inner.find(id)
    }

    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    pub fn snapshot(&self) -> StoreState<Project> {
        self.inner.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState<Project>> {
        self.inner.subscribe()
    }
}
