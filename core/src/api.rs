//! The four operations on the remote todo resource.
//!
//! `TodoApi` pairs the request builder with a transport so callers deal in
//! `Todo`s instead of requests. There are no retries: the first failure is
//! returned to the caller.

use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::types::{Todo, TodoPatch};

#[derive(Debug, Clone)]
pub struct TodoApi<T> {
    client: TodoClient,
    transport: T,
}

impl<T: Transport> TodoApi<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &TodoClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn list(&self) -> Result<Vec<Todo>, ApiError> {
        let request = self.client.build_list_todos();
        let response = self.send("list", request).await?;
        self.client
            .parse_list_todos(response)
            .inspect_err(|e| warn!(error = %e, "list todos failed"))
    }

    pub async fn create(&self, title: &str, completed: bool) -> Result<Todo, ApiError> {
        let request = self.client.build_create_todo(title, completed)?;
        let response = self.send("create", request).await?;
        self.client
            .parse_create_todo(response)
            .inspect_err(|e| warn!(error = %e, "create todo failed"))
    }

    pub async fn patch(&self, id: i64, patch: &TodoPatch) -> Result<Todo, ApiError> {
        let request = self.client.build_patch_todo(id, patch)?;
        let response = self.send("patch", request).await?;
        self.client
            .parse_patch_todo(response)
            .inspect_err(|e| warn!(id, error = %e, "patch todo failed"))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let request = self.client.build_delete_todo(id);
        let response = self.send("delete", request).await?;
        self.client
            .parse_delete_todo(response)
            .inspect_err(|e| warn!(id, error = %e, "delete todo failed"))
    }

    async fn send(&self, op: &'static str, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(op, method = request.method.as_str(), path = %request.path, "issuing request");
        self.transport
            .execute(request)
            .await
            .inspect_err(|e| warn!(op, error = %e, "transport failed"))
    }
}
