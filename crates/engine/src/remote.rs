use std::future::Future;

use api_types::{
    health::Health,
    todo::{Todo, TodoId, TodoNew, TodoQuery, TodoUpdate},
};

use crate::error::RemoteError;

/// The remote todo collection.
///
/// One method per REST verb. Every call either yields the decoded record(s)
/// or a [`RemoteError`]; nothing is cached and nothing is retried.
pub trait TodoRemote: Send + Sync {
    /// `GET /api/todos`. The filters are forwarded as-is, the server decides
    /// their semantics.
    fn list(&self, query: &TodoQuery)
    -> impl Future<Output = Result<Vec<Todo>, RemoteError>> + Send;

    /// `GET /api/todos/{id}`. Absence is a 404 [`RemoteError::ServerRejected`].
    fn get(&self, id: TodoId) -> impl Future<Output = Result<Todo, RemoteError>> + Send;

    /// `POST /api/todos`. The server assigns `id` and defaults.
    fn create(&self, draft: &TodoNew) -> impl Future<Output = Result<Todo, RemoteError>> + Send;

    /// `PUT /api/todos/{id}` with a partial record; returns the full record.
    fn update(
        &self,
        id: TodoId,
        patch: &TodoUpdate,
    ) -> impl Future<Output = Result<Todo, RemoteError>> + Send;

    /// `DELETE /api/todos/{id}`. A second delete of the same id fails.
    fn delete(&self, id: TodoId) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// `PATCH /api/todos/{id}/toggle`. The returned record is authoritative.
    fn toggle_complete(&self, id: TodoId)
    -> impl Future<Output = Result<Todo, RemoteError>> + Send;

    /// `GET /health`.
    fn health(&self) -> impl Future<Output = Result<Health, RemoteError>> + Send;
}
