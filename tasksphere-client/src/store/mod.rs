//! Resource stores
//!
//! A resource store is the client-side synchronizer for one REST collection.
//! It holds exactly one *current collection*, in server response order, and
//! keeps it consistent with the backend through a uniform set of operations.
//!
//! # Contract
//!
//! | Operation | On success | On failure |
//! |---|---|---|
//! | fetch / search / filter | collection replaced wholesale | logged, collection kept, error returned |
//! | create | server record appended | collection kept, error returned |
//! | update | matching id replaced in place | collection kept, error returned |
//! | delete | first matching id removed | collection kept, error returned |
//!
//! - No merging or de-duplication across fetches: the last fetch wins.
//! - `loading` is raised for the duration of every read.
//! - Overlapping mutations are not synchronized: whichever response lands
//!   last is what the collection shows.
//! - A cancelled call never mutates the collection.
//!
//! State is published through a `tokio::sync::watch` channel so views can
//! either take a snapshot or subscribe to changes.

pub mod projects;
pub mod tasks;

pub use projects::ProjectStore;
pub use tasks::TaskStore;

use serde::{de::DeserializeOwned, Serialize};
use tasksphere_shared::models::RecordId;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use validator::Validate;

use crate::api::{to_body, ApiClient};
use crate::error::{ClientError, ClientResult};
use crate::transport::ApiRequest;

/// A record type synchronized by a [`ResourceStore`]
pub trait Resource: Clone + Send + Sync + DeserializeOwned + 'static {
    /// Singular noun used in logs and fallback messages ("project")
    const KIND: &'static str;

    /// Collection path on the backend ("/api/projects")
    const COLLECTION_PATH: &'static str;

    /// Backend-assigned identity
    fn id(&self) -> RecordId;
}

/// Snapshot of a store
#[derive(Debug, Clone)]
pub struct StoreState<R> {
    /// Current collection, in server response order
    pub items: Vec<R>,

    /// Reads currently in flight
    in_flight: usize,
}

impl<R> StoreState<R> {
    /// Whether any read is in flight
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of records in the current collection
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the current collection is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        StoreState {
            items: Vec::new(),
            in_flight: 0,
        }
    }
}

/// Lowers the loading counter when a read ends, however it ends
struct LoadingGuard<'a, R> {
    state: &'a watch::Sender<StoreState<R>>,
}

impl<'a, R> LoadingGuard<'a, R> {
    fn begin(state: &'a watch::Sender<StoreState<R>>) -> Self {
        state.send_modify(|s| s.in_flight += 1);
        LoadingGuard { state }
    }
}

impl<R> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        self.state
            .send_modify(|s| s.in_flight = s.in_flight.saturating_sub(1));
    }
}

/// Generic resource store
pub struct ResourceStore<R: Resource> {
    api: ApiClient,
    state: watch::Sender<StoreState<R>>,
}

impl<R: Resource> ResourceStore<R> {
    /// Creates an empty store
    pub fn new(api: ApiClient) -> Self {
        let (state, _rx) = watch::channel(StoreState::default());
        ResourceStore { api, state }
    }

    /// Current state
    pub fn snapshot(&self) -> StoreState<R> {
        self.state.borrow().clone()
    }

    /// Current collection
    pub fn items(&self) -> Vec<R> {
        self.state.borrow().items.clone()
    }

    /// Whether any read is in flight
    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Whether a record with `id` is in the current collection
    pub fn contains(&self, id: RecordId) -> bool {
        self.state.borrow().items.iter().any(|r| r.id() == id)
    }

    /// Record with `id` from the current collection
    pub fn find(&self, id: RecordId) -> Option<R> {
        self.state.borrow().items.iter().find(|r| r.id() == id).cloned()
    }

    /// Subscribes to state changes
    pub fn subscribe(&self) -> watch::Receiver<StoreState<R>> {
        self.state.subscribe()
    }

    /// Path of one record
    pub fn record_path(id: RecordId) -> String {
        format!("{}/{}", R::COLLECTION_PATH, id)
    }

    /// Runs a read and replaces the collection with its result
    ///
    /// `action` names the read in logs ("fetching my projects").
    pub async fn replace_with(
        &self,
        request: ApiRequest,
        action: &str,
        cancel: &CancellationToken,
    ) -> ClientResult<()> {
        let result = {
            let _loading = LoadingGuard::begin(&self.state);
            self.api.fetch::<Vec<R>>(request, cancel).await
        };

        match result {
            Ok(_) if cancel.is_cancelled() => Err(ClientError::Cancelled),
            Ok(items) => {
                tracing::debug!(kind = R::KIND, count = items.len(), "Finished {}", action);
                self.state.send_modify(|s| s.items = items);
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                tracing::error!(kind = R::KIND, error = %e, "Error {}", action);
                Err(e)
            }
        }
    }

    /// Fetches one record without touching the collection
    pub async fn get(&self, id: RecordId, cancel: &CancellationToken) -> ClientResult<R> {
        self.api
            .fetch(ApiRequest::get(Self::record_path(id)), cancel)
            .await
    }

    /// Creates a record and appends the server's copy to the collection
    pub async fn create<I>(&self, input: &I, cancel: &CancellationToken) -> ClientResult<R>
    where
        I: Serialize + Validate,
    {
        input.validate()?;

        let request = ApiRequest::post(R::COLLECTION_PATH, to_body(input)?);
        let record: R = self.api.fetch(request, cancel).await.map_err(|e| {
            tracing::warn!(kind = R::KIND, error = %e, "Create rejected");
            e
        })?;

        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        tracing::info!(kind = R::KIND, id = record.id(), "Created");
        self.state.send_modify(|s| s.items.push(record.clone()));
        Ok(record)
    }

    /// Updates a record and replaces it in place
    ///
    /// Fails with `NotFound` without contacting the backend when `id` is not
    /// in the current collection.
    pub async fn update<I>(&self, id: RecordId, input: &I, cancel: &CancellationToken) -> ClientResult<R>
    where
        I: Serialize + Validate,
    {
        if !self.contains(id) {
            tracing::warn!(kind = R::KIND, id, "Update of record outside the current collection");
            return Err(ClientError::NotFound(format!(
                "{} {} is not in the current collection",
                R::KIND,
                id
            )));
        }

        input.validate()?;

        let request = ApiRequest::put(Self::record_path(id), to_body(input)?);
        let record: R = self.api.fetch(request, cancel).await.map_err(|e| {
            tracing::warn!(kind = R::KIND, id, error = %e, "Update rejected");
            e
        })?;

        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        tracing::info!(kind = R::KIND, id, "Updated");
        self.state.send_modify(|s| {
            if let Some(slot) = s.items.iter_mut().find(|r| r.id() == id) {
                *slot = record.clone();
            }
        });
        Ok(record)
    }

    /// Deletes a record and removes it from the collection
    pub async fn delete(&self, id: RecordId, cancel: &CancellationToken) -> ClientResult<()> {
        self.api
            .send(ApiRequest::delete(Self::record_path(id)), cancel)
            .await
            .map_err(|e| {
                tracing::warn!(kind = R::KIND, id, error = %e, "Delete rejected");
                e
            })?;

        if cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        tracing::info!(kind = R::KIND, id, "Deleted");
        self.state.send_modify(|s| {
            if let Some(position) = s.items.iter().position(|r| r.id() == id) {
                s.items.remove(position);
            }
        });
        Ok(())
    }
}
