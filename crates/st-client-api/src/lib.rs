//! Client API trait shared by the REST client and the mock client

use async_trait::async_trait;
use st_rest_api_contract::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientApiError {
    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),
    /// The backend answered with a non-success status
    #[error("server returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unexpected: {0}")]
    Unexpected(String),
}

impl ClientApiError {
    /// Status code carried by a protocol failure
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientApiError::Status { status, .. } => Some(*status),
            ClientApiError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

pub type ClientApiResult<T> = Result<T, ClientApiError>;

/// Every capability of the Smart Todo backend, one method per endpoint.
#[async_trait]
pub trait ClientApi: Send + Sync {
    // Tasks
    async fn list_tasks(&self, filter: &TaskFilter) -> ClientApiResult<ListResponse<Task>>;
    async fn get_task(&self, id: TaskId) -> ClientApiResult<Task>;
    async fn create_task(&self, request: &TaskCreateRequest) -> ClientApiResult<Task>;
    async fn update_task(&self, id: TaskId, request: &TaskUpdateRequest) -> ClientApiResult<Task>;
    async fn delete_task(&self, id: TaskId) -> ClientApiResult<()>;
    async fn task_stats(&self) -> ClientApiResult<TaskStats>;
    async fn toggle_task_status(&self, id: TaskId) -> ClientApiResult<Task>;

    // Categories
    async fn list_categories(&self) -> ClientApiResult<Vec<Category>>;

    // Context entries
    async fn list_context_entries(
        &self,
        filter: &ContextFilter,
    ) -> ClientApiResult<ListResponse<ContextEntry>>;
    async fn create_context_entry(
        &self,
        request: &ContextEntryCreateRequest,
    ) -> ClientApiResult<ContextEntry>;
    async fn context_stats(&self) -> ClientApiResult<serde_json::Value>;
    async fn context_insights(&self) -> ClientApiResult<serde_json::Value>;
    async fn reprocess_context_entry(&self, id: ContextEntryId)
        -> ClientApiResult<serde_json::Value>;

    // AI delegation
    async fn enhance_task(&self, request: &EnhanceTaskRequest) -> ClientApiResult<AiEnhancement>;
    async fn prioritize_tasks(&self, task_ids: &[TaskId])
        -> ClientApiResult<PrioritizeTasksResponse>;
    async fn analyze_context(
        &self,
        content: &str,
        source_type: SourceType,
    ) -> ClientApiResult<serde_json::Value>;
    async fn ai_capabilities(&self) -> ClientApiResult<serde_json::Value>;
}
