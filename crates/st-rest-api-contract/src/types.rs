//! API contract types for the Smart Todo REST service

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ApiContractError;

pub type TaskId = u64;
pub type CategoryId = u64;
pub type ContextEntryId = u64;

/// Number of characters the backend keeps in a context entry preview
pub const PREVIEW_LENGTH: usize = 100;

/// Task lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Status after a `toggle_status` call: completed goes back to pending,
    /// everything else becomes completed.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Completed => TaskStatus::Pending,
            _ => TaskStatus::Completed,
        }
    }

    /// Whether the task still counts as open work
    pub fn is_open(&self) -> bool {
        matches!(self, TaskStatus::Pending | TaskStatus::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            other => Err(ApiContractError::InvalidTaskStatus(other.to_string())),
        }
    }
}

/// Where a context entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Whatsapp,
    Email,
    Notes,
    Calendar,
    Other,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Whatsapp => "whatsapp",
            SourceType::Email => "email",
            SourceType::Notes => "notes",
            SourceType::Calendar => "calendar",
            SourceType::Other => "other",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whatsapp" => Ok(SourceType::Whatsapp),
            "email" => Ok(SourceType::Email),
            "notes" => Ok(SourceType::Notes),
            "calendar" => Ok(SourceType::Calendar),
            "other" => Ok(SourceType::Other),
            other => Err(ApiContractError::InvalidSourceType(other.to_string())),
        }
    }
}

/// Priority band accepted by the task list `priority` filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityFilter {
    High,
    Medium,
    Low,
}

impl PriorityFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityFilter::High => "high",
            PriorityFilter::Medium => "medium",
            PriorityFilter::Low => "low",
        }
    }

    /// Whether a priority score falls inside this band
    pub fn matches(&self, score: i32) -> bool {
        match self {
            PriorityFilter::High => score >= 8,
            PriorityFilter::Medium => (6..8).contains(&score),
            PriorityFilter::Low => score < 6,
        }
    }
}

impl fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriorityFilter {
    type Err = ApiContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(PriorityFilter::High),
            "medium" => Ok(PriorityFilter::Medium),
            "low" => Ok(PriorityFilter::Low),
            other => Err(ApiContractError::InvalidPriority(other.to_string())),
        }
    }
}

/// Human readable level the backend derives from a priority score
pub fn priority_level_for(score: i32) -> &'static str {
    if score >= 8 {
        "High"
    } else if score >= 6 {
        "Medium"
    } else {
        "Low"
    }
}

/// Shortened content the backend exposes as `preview`
pub fn preview_of(content: &str) -> String {
    if content.chars().count() > PREVIEW_LENGTH {
        let mut preview: String = content.chars().take(PREVIEW_LENGTH).collect();
        preview.push_str("...");
        preview
    } else {
        content.to_string()
    }
}

/// Task as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<CategoryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub priority_score: i32,
    pub priority_level: String,
    pub deadline: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    #[serde(default)]
    pub ai_suggested: bool,
    #[serde(default)]
    pub ai_insights: String,
    #[serde(default)]
    pub ai_enhanced_description: String,
    #[serde(default)]
    pub is_overdue: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Task category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub usage_frequency: u32,
    pub created_at: DateTime<Utc>,
}

/// Raw context snippet plus the backend's analysis of it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub id: ContextEntryId,
    pub content: String,
    #[serde(default)]
    pub preview: String,
    pub source_type: SourceType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub processed_insights: serde_json::Value,
    #[serde(default)]
    pub extracted_tasks: Vec<serde_json::Value>,
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default)]
    pub processing_error: String,
}

/// Aggregate task counters from `/tasks/stats/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskStats {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub in_progress_tasks: u64,
    pub high_priority_tasks: u64,
    pub ai_suggested_tasks: u64,
    pub overdue_tasks: u64,
}

/// Suggestion payload from `/ai/enhance-task/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiEnhancement {
    pub priority: i32,
    pub suggested_deadline: Option<String>,
    #[serde(default)]
    pub enhanced_description: String,
    #[serde(default)]
    pub suggested_categories: Vec<String>,
    #[serde(default)]
    pub insights: String,
}

/// Paginated list envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub results: Vec<T>,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
}

impl<T> ListResponse<T> {
    /// Single-page envelope holding every result
    pub fn from_results(results: Vec<T>) -> Self {
        let count = results.len() as u64;
        Self {
            results,
            count,
            next: None,
            previous: None,
        }
    }
}

/// `/tasks/categories/` answers either with an envelope or a bare list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryListResponse {
    Wrapped(CategoryPage),
    Bare(Vec<Category>),
}

/// Any object carrying a `results` list; paging fields are ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPage {
    pub results: Vec<Category>,
}

impl CategoryListResponse {
    pub fn into_categories(self) -> Vec<Category> {
        match self {
            CategoryListResponse::Wrapped(page) => page.results,
            CategoryListResponse::Bare(categories) => categories,
        }
    }
}

/// Query filters for the task list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<PriorityFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_suggested: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Query filters for the context entry list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContextFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_processed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_back: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Task creation request
///
/// `category_name` makes the backend reuse or create the named category.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TaskCreateRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

/// Full replacement body for `PUT /tasks/{id}/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdateRequest {
    pub title: String,
    pub description: String,
    pub category: Option<CategoryId>,
    pub priority_score: i32,
    pub deadline: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub ai_suggested: bool,
    pub ai_insights: String,
    pub ai_enhanced_description: String,
}

impl From<&Task> for TaskUpdateRequest {
    fn from(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            category: task.category,
            priority_score: task.priority_score,
            deadline: task.deadline,
            status: task.status,
            ai_suggested: task.ai_suggested,
            ai_insights: task.ai_insights.clone(),
            ai_enhanced_description: task.ai_enhanced_description.clone(),
        }
    }
}

/// Context entry creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntryCreateRequest {
    pub content: String,
    pub source_type: SourceType,
}

/// Body for `/ai/enhance-task/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhanceTaskRequest {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Body for `/ai/prioritize-tasks/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrioritizeTasksRequest {
    pub task_ids: Vec<TaskId>,
}

/// Reordered tasks plus the backend's rationale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizeTasksResponse {
    pub prioritized_tasks: Vec<Task>,
    #[serde(default)]
    pub reasoning: String,
}

/// Body for `/ai/analyze-context/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeContextRequest {
    pub content: String,
    pub source_type: SourceType,
}

// Typed views over payloads the client hands back as raw JSON.

/// Decode an opaque payload into one of the typed views below
pub fn typed_view<T: DeserializeOwned>(value: &serde_json::Value) -> Result<T, ApiContractError> {
    Ok(T::deserialize(value)?)
}

/// Shape of `/context/stats/`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextStats {
    pub total_entries: u64,
    pub processed_entries: u64,
    pub processing_rate: f64,
    pub recent_entries: u64,
    #[serde(default)]
    pub source_breakdown: Vec<SourceBreakdown>,
    #[serde(default)]
    pub avg_sentiment: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBreakdown {
    pub source_type: SourceType,
    pub count: u64,
}

/// Shape of `/context/insights/`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContextInsights {
    pub total_insights: u64,
    /// `(keyword, occurrences)` pairs, most frequent first
    #[serde(default)]
    pub top_keywords: Vec<(String, u64)>,
    #[serde(default)]
    pub recent_insights: Vec<serde_json::Value>,
}

/// Shape of `/ai/capabilities/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiCapabilities {
    #[serde(default)]
    pub available_providers: Vec<AiProvider>,
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiProvider {
    pub name: String,
    #[serde(rename = "type")]
    pub provider_type: String,
    pub status: String,
}

/// Shape of `/context/{id}/reprocess/`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReprocessResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn category_json(id: u64, name: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "usage_frequency": 3,
            "created_at": "2025-01-01T09:00:00Z"
        })
    }

    #[test]
    fn test_task_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!("cancelled".parse::<TaskStatus>().unwrap(), TaskStatus::Cancelled);
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_toggle_status_follows_backend_rules() {
        assert_eq!(TaskStatus::Pending.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Completed.toggled(), TaskStatus::Pending);
        assert_eq!(TaskStatus::InProgress.toggled(), TaskStatus::Completed);
        assert_eq!(TaskStatus::Cancelled.toggled(), TaskStatus::Completed);
    }

    #[test]
    fn test_priority_bands() {
        assert!(PriorityFilter::High.matches(8));
        assert!(!PriorityFilter::High.matches(7));
        assert!(PriorityFilter::Medium.matches(6));
        assert!(PriorityFilter::Medium.matches(7));
        assert!(PriorityFilter::Low.matches(5));
        assert_eq!(priority_level_for(9), "High");
        assert_eq!(priority_level_for(6), "Medium");
        assert_eq!(priority_level_for(1), "Low");
    }

    #[test]
    fn test_preview_truncates_long_content() {
        let long = "a".repeat(150);
        let preview = preview_of(&long);
        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));
        assert_eq!(preview_of("buy milk"), "buy milk");
    }

    #[test]
    fn test_task_deserializes_backend_payload() {
        let task: Task = serde_json::from_value(json!({
            "id": 42,
            "title": "Complete project presentation",
            "description": "Prepare slides for quarterly review meeting",
            "category": 1,
            "category_name": "Work",
            "priority_score": 9,
            "priority_level": "High",
            "deadline": "2025-01-08T00:00:00Z",
            "status": "pending",
            "ai_suggested": true,
            "ai_insights": "High priority based on upcoming deadline",
            "ai_enhanced_description": "",
            "is_overdue": false,
            "created_at": "2025-01-01T09:00:00Z",
            "updated_at": "2025-01-02T09:00:00Z"
        }))
        .unwrap();

        assert_eq!(task.id, 42);
        assert_eq!(task.category_name.as_deref(), Some("Work"));
        assert_eq!(task.status, TaskStatus::Pending);
        assert!(task.deadline.is_some());
    }

    #[test]
    fn test_category_list_accepts_both_shapes() {
        let bare: CategoryListResponse =
            serde_json::from_value(json!([category_json(1, "Work"), category_json(2, "Health")]))
                .unwrap();
        let wrapped: CategoryListResponse = serde_json::from_value(json!({
            "count": 2,
            "results": [category_json(1, "Work"), category_json(2, "Health")]
        }))
        .unwrap();

        let results_only: CategoryListResponse = serde_json::from_value(json!({
            "results": [category_json(1, "Work"), category_json(2, "Health")]
        }))
        .unwrap();

        let bare = bare.into_categories();
        let wrapped = wrapped.into_categories();
        assert_eq!(bare, wrapped);
        assert_eq!(bare, results_only.into_categories());
        assert_eq!(bare[0].name, "Work");
        assert_eq!(bare[1].name, "Health");
    }

    #[test]
    fn test_create_request_omits_unset_fields() {
        let request = TaskCreateRequest {
            title: "Buy groceries".to_string(),
            priority_score: Some(5),
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"title": "Buy groceries", "priority_score": 5})
        );
    }

    #[test]
    fn test_context_entry_defaults_missing_analysis() {
        let entry: ContextEntry = serde_json::from_value(json!({
            "id": 7,
            "content": "buy milk",
            "source_type": "notes",
            "timestamp": "2025-01-05T08:30:00Z",
            "sentiment_score": null
        }))
        .unwrap();

        assert_eq!(entry.source_type, SourceType::Notes);
        assert!(entry.processed_insights.is_null());
        assert!(entry.extracted_tasks.is_empty());
        assert!(!entry.is_processed);
    }

    #[test]
    fn test_typed_views_over_opaque_payloads() {
        let insights: ContextInsights = typed_view(&json!({
            "total_insights": 2,
            "top_keywords": [["meeting", 3], ["report", 1]],
            "recent_insights": ["Client meeting tomorrow"]
        }))
        .unwrap();
        assert_eq!(insights.top_keywords[0], ("meeting".to_string(), 3));

        let capabilities: AiCapabilities = typed_view(&json!({
            "available_providers": [{"name": "Rule-based Fallback", "type": "local", "status": "available"}],
            "features": {"task_enhancement": true},
            "status": "operational"
        }))
        .unwrap();
        assert_eq!(capabilities.available_providers[0].provider_type, "local");
        assert_eq!(capabilities.features.get("task_enhancement"), Some(&true));
    }
}
