//! REST API client for the Smart Todo service
//!
//! This crate provides a typed HTTP client for the Smart Todo backend: task,
//! category and context entry resources plus the AI delegation endpoints.
//! Every call is a single round-trip with a JSON body in and a JSON body out.

pub mod client;
pub mod error;
pub mod headers;

pub use client::*;
pub use error::*;
pub use headers::*;

use async_trait::async_trait;
use st_client_api::{ClientApi, ClientApiResult};
use st_rest_api_contract::*;

#[async_trait]
impl ClientApi for client::RestClient {
    async fn list_tasks(&self, filter: &TaskFilter) -> ClientApiResult<ListResponse<Task>> {
        Ok(self.list_tasks(Some(filter)).await?)
    }

    async fn get_task(&self, id: TaskId) -> ClientApiResult<Task> {
        Ok(self.get_task(id).await?)
    }

    async fn create_task(&self, request: &TaskCreateRequest) -> ClientApiResult<Task> {
        Ok(self.create_task(request).await?)
    }

    async fn update_task(&self, id: TaskId, request: &TaskUpdateRequest) -> ClientApiResult<Task> {
        Ok(self.update_task(id, request).await?)
    }

    async fn delete_task(&self, id: TaskId) -> ClientApiResult<()> {
        Ok(self.delete_task(id).await?)
    }

    async fn task_stats(&self) -> ClientApiResult<TaskStats> {
        Ok(self.task_stats().await?)
    }

    async fn toggle_task_status(&self, id: TaskId) -> ClientApiResult<Task> {
        Ok(self.toggle_task_status(id).await?)
    }

    async fn list_categories(&self) -> ClientApiResult<Vec<Category>> {
        Ok(self.list_categories().await?)
    }

    async fn list_context_entries(
        &self,
        filter: &ContextFilter,
    ) -> ClientApiResult<ListResponse<ContextEntry>> {
        Ok(self.list_context_entries(Some(filter)).await?)
    }

    async fn create_context_entry(
        &self,
        request: &ContextEntryCreateRequest,
    ) -> ClientApiResult<ContextEntry> {
        Ok(self.create_context_entry(request).await?)
    }

    async fn context_stats(&self) -> ClientApiResult<serde_json::Value> {
        Ok(self.context_stats().await?)
    }

    async fn context_insights(&self) -> ClientApiResult<serde_json::Value> {
        Ok(self.context_insights().await?)
    }

    async fn reprocess_context_entry(
        &self,
        id: ContextEntryId,
    ) -> ClientApiResult<serde_json::Value> {
        Ok(self.reprocess_context_entry(id).await?)
    }

    async fn enhance_task(&self, request: &EnhanceTaskRequest) -> ClientApiResult<AiEnhancement> {
        Ok(self.enhance_task(request).await?)
    }

    async fn prioritize_tasks(
        &self,
        task_ids: &[TaskId],
    ) -> ClientApiResult<PrioritizeTasksResponse> {
        Ok(self.prioritize_tasks(task_ids).await?)
    }

    async fn analyze_context(
        &self,
        content: &str,
        source_type: SourceType,
    ) -> ClientApiResult<serde_json::Value> {
        Ok(self.analyze_context(content, source_type).await?)
    }

    async fn ai_capabilities(&self) -> ClientApiResult<serde_json::Value> {
        Ok(self.ai_capabilities().await?)
    }
}
