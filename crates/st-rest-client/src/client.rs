//! Main REST API client implementation

use reqwest::{Client as HttpClient, Method};
use serde::{de::DeserializeOwned, Serialize};
use st_rest_api_contract::*;
use tracing::{debug, error};
use url::{form_urlencoded, Url};

use crate::error::{RestClientError, RestClientResult};
use crate::headers::HeaderConfig;

/// Address of a locally running backend
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// REST API client for the Smart Todo service
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: HttpClient,
    base_url: Url,
    headers: HeaderConfig,
}

impl RestClient {
    /// Create a new REST client
    pub fn new(base_url: Url, headers: HeaderConfig) -> RestClientResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("st-cli/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            headers,
        })
    }

    /// Create a client from a base URL string
    pub fn from_url(base_url: &str, headers: HeaderConfig) -> RestClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        Self::new(base_url, headers)
    }

    /// Client for a backend at [`DEFAULT_BASE_URL`]
    pub fn localhost() -> RestClientResult<Self> {
        Self::from_url(DEFAULT_BASE_URL, HeaderConfig::default())
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Get the header configuration
    pub fn headers(&self) -> &HeaderConfig {
        &self.headers
    }

    /// Client for a single call that also sends `name: value`.
    ///
    /// Shares the connection pool with `self`; `self` is left unchanged.
    pub fn with_header(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut client = self.clone();
        client.headers = client.headers.with_header(name, value);
        client
    }

    // Tasks

    /// List tasks, optionally filtered
    pub async fn list_tasks(
        &self,
        filters: Option<&TaskFilter>,
    ) -> RestClientResult<ListResponse<Task>> {
        let path = resource_path("/tasks/", filters)?;
        self.get(&path).await
    }

    pub async fn get_task(&self, id: TaskId) -> RestClientResult<Task> {
        self.get(&format!("/tasks/{}/", id)).await
    }

    pub async fn create_task(&self, task: &TaskCreateRequest) -> RestClientResult<Task> {
        self.post("/tasks/", task).await
    }

    /// Replace a task with the given body
    pub async fn update_task(
        &self,
        id: TaskId,
        task: &TaskUpdateRequest,
    ) -> RestClientResult<Task> {
        self.put(&format!("/tasks/{}/", id), task).await
    }

    pub async fn delete_task(&self, id: TaskId) -> RestClientResult<()> {
        self.delete(&format!("/tasks/{}/", id)).await
    }

    pub async fn task_stats(&self) -> RestClientResult<TaskStats> {
        self.get("/tasks/stats/").await
    }

    /// Flip a task between pending and completed on the server
    pub async fn toggle_task_status(&self, id: TaskId) -> RestClientResult<Task> {
        self.post_empty(&format!("/tasks/{}/toggle_status/", id))
            .await
    }

    // Categories

    /// List categories, unwrapping a paginated envelope when present
    pub async fn list_categories(&self) -> RestClientResult<Vec<Category>> {
        let response: CategoryListResponse = self.get("/tasks/categories/").await?;
        Ok(response.into_categories())
    }

    // Context entries

    pub async fn list_context_entries(
        &self,
        filters: Option<&ContextFilter>,
    ) -> RestClientResult<ListResponse<ContextEntry>> {
        let path = resource_path("/context/", filters)?;
        self.get(&path).await
    }

    pub async fn create_context_entry(
        &self,
        entry: &ContextEntryCreateRequest,
    ) -> RestClientResult<ContextEntry> {
        self.post("/context/", entry).await
    }

    pub async fn context_stats(&self) -> RestClientResult<serde_json::Value> {
        self.get("/context/stats/").await
    }

    pub async fn context_insights(&self) -> RestClientResult<serde_json::Value> {
        self.get("/context/insights/").await
    }

    /// Ask the backend to run its analysis on an entry again
    pub async fn reprocess_context_entry(
        &self,
        id: ContextEntryId,
    ) -> RestClientResult<serde_json::Value> {
        self.post_empty(&format!("/context/{}/reprocess/", id))
            .await
    }

    // AI delegation

    pub async fn enhance_task(
        &self,
        task: &EnhanceTaskRequest,
    ) -> RestClientResult<AiEnhancement> {
        self.post("/ai/enhance-task/", task).await
    }

    pub async fn prioritize_tasks(
        &self,
        task_ids: &[TaskId],
    ) -> RestClientResult<PrioritizeTasksResponse> {
        let body = PrioritizeTasksRequest {
            task_ids: task_ids.to_vec(),
        };
        self.post("/ai/prioritize-tasks/", &body).await
    }

    pub async fn analyze_context(
        &self,
        content: &str,
        source_type: SourceType,
    ) -> RestClientResult<serde_json::Value> {
        let body = AnalyzeContextRequest {
            content: content.to_string(),
            source_type,
        };
        self.post("/ai/analyze-context/", &body).await
    }

    pub async fn ai_capabilities(&self) -> RestClientResult<serde_json::Value> {
        self.get("/ai/capabilities/").await
    }

    // Private helper methods

    async fn get<T: DeserializeOwned>(&self, path: &str) -> RestClientResult<T> {
        self.request(Method::GET, path, None::<&()>).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> RestClientResult<T> {
        self.request(Method::POST, path, None::<&()>).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> RestClientResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn delete(&self, path: &str) -> RestClientResult<()> {
        let result = self
            .execute(Method::DELETE, path, None::<&()>)
            .await
            .map(|_| ());
        log_failure(&Method::DELETE, path, result)
    }

    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> RestClientResult<T> {
        let result = match self.execute(method.clone(), path, body).await {
            Ok(text) => serde_json::from_str(&text).map_err(RestClientError::from),
            Err(err) => Err(err),
        };
        log_failure(&method, path, result)
    }

    /// Issue one request and return the body of a successful response
    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> RestClientResult<String> {
        let url = self.endpoint(path)?;
        debug!(%method, %url, "sending API request");

        let mut request = self
            .http_client
            .request(method, url)
            .headers(self.headers.headers()?);

        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            Ok(text)
        } else {
            Err(RestClientError::Status { status, body: text })
        }
    }

    /// Append a resource path to the base address
    fn endpoint(&self, path: &str) -> RestClientResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}{}", base, path))?)
    }
}

fn log_failure<T>(method: &Method, path: &str, result: RestClientResult<T>) -> RestClientResult<T> {
    if let Err(err) = &result {
        error!(%method, path, error = %err, "API request failed");
    }
    result
}

/// Resource path with the filter object encoded as its query string.
///
/// Unset and null fields are left out; an empty filter yields the bare path.
pub fn resource_path<T: Serialize>(path: &str, filters: Option<&T>) -> RestClientResult<String> {
    let query = match filters {
        Some(filters) => build_query_params(filters)?,
        None => String::new(),
    };

    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, query))
    }
}

fn build_query_params<T: Serialize>(params: &T) -> RestClientResult<String> {
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    if let serde_json::Value::Object(map) = serde_json::to_value(params)? {
        for (key, val) in map {
            let val_str = match val {
                serde_json::Value::Null => continue,
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => other.to_string(),
            };
            serializer.append_pair(&key, &val_str);
        }
    }

    Ok(serializer.finish())
}
