//! Mock REST client backed by in-memory demo data
//!
//! Mirrors the backend's filtering, ordering and status rules closely enough
//! to drive a front end without a server. AI endpoints answer with canned
//! suggestions.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use st_client_api::{ClientApi, ClientApiError, ClientApiResult};
use st_rest_api_contract::*;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

const DEFAULT_PRIORITY: i32 = 5;

pub struct MockClient {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    context_entries: Vec<ContextEntry>,
    next_task_id: TaskId,
    next_category_id: CategoryId,
    next_context_id: ContextEntryId,
}

impl MockClient {
    /// Client with no data at all
    pub fn empty() -> Self {
        Self {
            state: Mutex::new(MockState {
                next_task_id: 1,
                next_category_id: 1,
                next_context_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Client seeded with the demo tasks, categories and context history
    pub fn with_demo_data() -> Self {
        let client = Self::empty();
        client.state().seed_demo_data();
        client
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::with_demo_data()
    }
}

fn date(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Start of a `days_back` window; `None` when it reaches past the representable range
fn window_start(now: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
    Duration::try_days(i64::from(days)).and_then(|span| now.checked_sub_signed(span))
}

fn bad_request(message: &str) -> ClientApiError {
    ClientApiError::Status {
        status: 400,
        message: json!({ "error": message }).to_string(),
    }
}

/// Refresh the fields the backend derives on every read
fn derived(mut task: Task, now: DateTime<Utc>) -> Task {
    task.priority_level = priority_level_for(task.priority_score).to_string();
    task.is_overdue = match task.deadline {
        Some(deadline) => task.status.is_open() && now > deadline,
        None => false,
    };
    task
}

impl MockState {
    fn seed_demo_data(&mut self) {
        let now = Utc::now();
        for name in ["Work", "Personal", "Health"] {
            self.category_named(name, now);
        }

        let seeds = [
            (
                "Complete project presentation",
                "Prepare slides for quarterly review meeting",
                "Work",
                9,
                date(2025, 1, 8),
                TaskStatus::Pending,
                Some("High priority based on upcoming deadline and email context"),
            ),
            (
                "Buy groceries",
                "Weekly grocery shopping for the family",
                "Personal",
                5,
                date(2025, 1, 6),
                TaskStatus::Pending,
                None,
            ),
            (
                "Schedule dentist appointment",
                "Annual dental checkup",
                "Health",
                6,
                date(2025, 1, 15),
                TaskStatus::Completed,
                Some("Suggested based on calendar analysis"),
            ),
        ];

        for (title, description, category, priority, deadline, status, insights) in seeds {
            let request = TaskCreateRequest {
                title: title.to_string(),
                description: Some(description.to_string()),
                category_name: Some(category.to_string()),
                priority_score: Some(priority),
                deadline,
                status: Some(status),
            };
            let id = self.insert_task(&request, now).id;
            if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
                task.ai_suggested = insights.is_some();
                task.ai_insights = insights.unwrap_or_default().to_string();
            }
        }

        let history = [
            (
                "Meeting with client tomorrow at 3 PM. Need to prepare the quarterly report.",
                SourceType::Whatsapp,
                [
                    "High priority task detected",
                    "Deadline: Tomorrow 3 PM",
                    "Context: Client meeting",
                ],
                ["client", "meeting", "report"],
            ),
            (
                "Reminder: Annual performance reviews are due by January 15th.",
                SourceType::Email,
                [
                    "Deadline detected: Jan 15",
                    "Task type: Performance review",
                    "Category: HR/Work",
                ],
                ["performance", "review", "deadline"],
            ),
            (
                "Grocery list: milk, bread, eggs. Also need to book dentist appointment.",
                SourceType::Notes,
                [
                    "Personal tasks identified",
                    "Categories: Shopping, Health",
                    "Multiple actions needed",
                ],
                ["grocery", "dentist", "appointment"],
            ),
        ];

        for (offset, (content, source_type, insights, keywords)) in
            history.into_iter().enumerate()
        {
            let request = ContextEntryCreateRequest {
                content: content.to_string(),
                source_type,
            };
            let timestamp = now - Duration::hours(offset as i64 + 1);
            let id = self.insert_context_entry(&request, timestamp).id;
            if let Some(entry) = self.context_entries.iter_mut().find(|e| e.id == id) {
                entry.processed_insights = json!({ "insights": insights });
                entry.keywords = keywords.iter().map(|k| k.to_string()).collect();
                entry.is_processed = true;
            }
        }
    }

    /// Existing category with this name, or a new one
    fn category_named(&mut self, name: &str, now: DateTime<Utc>) -> CategoryId {
        if let Some(category) = self.categories.iter().find(|c| c.name == name) {
            return category.id;
        }
        let id = self.next_category_id;
        self.next_category_id += 1;
        self.categories.push(Category {
            id,
            name: name.to_string(),
            usage_frequency: 0,
            created_at: now,
        });
        id
    }

    fn category_name(&self, id: Option<CategoryId>) -> Option<String> {
        id.and_then(|id| self.categories.iter().find(|c| c.id == id))
            .map(|c| c.name.clone())
    }

    fn insert_task(&mut self, request: &TaskCreateRequest, now: DateTime<Utc>) -> Task {
        let category = request
            .category_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| self.category_named(name, now));
        if let Some(category) = self.categories.iter_mut().find(|c| Some(c.id) == category) {
            category.usage_frequency += 1;
        }

        let id = self.next_task_id;
        self.next_task_id += 1;

        let task = derived(
            Task {
                id,
                title: request.title.clone(),
                description: request.description.clone().unwrap_or_default(),
                category,
                category_name: self.category_name(category),
                priority_score: request.priority_score.unwrap_or(DEFAULT_PRIORITY),
                priority_level: String::new(),
                deadline: request.deadline,
                status: request.status.unwrap_or_default(),
                ai_suggested: false,
                ai_insights: String::new(),
                ai_enhanced_description: String::new(),
                is_overdue: false,
                created_at: now,
                updated_at: now,
            },
            now,
        );
        self.tasks.push(task.clone());
        task
    }

    fn insert_context_entry(
        &mut self,
        request: &ContextEntryCreateRequest,
        timestamp: DateTime<Utc>,
    ) -> ContextEntry {
        let id = self.next_context_id;
        self.next_context_id += 1;

        let entry = ContextEntry {
            id,
            content: request.content.clone(),
            preview: preview_of(&request.content),
            source_type: request.source_type,
            timestamp,
            processed_insights: json!({}),
            extracted_tasks: Vec::new(),
            sentiment_score: None,
            keywords: Vec::new(),
            is_processed: false,
            processing_error: String::new(),
        };
        self.context_entries.push(entry.clone());
        entry
    }

    fn task(&self, id: TaskId) -> ClientApiResult<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientApiError::NotFound(format!("task {}", id)))
    }

    fn task_mut(&mut self, id: TaskId) -> ClientApiResult<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ClientApiError::NotFound(format!("task {}", id)))
    }

    fn list_tasks(&self, filter: &TaskFilter, now: DateTime<Utc>) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| filter.status.map_or(true, |status| task.status == status))
            .filter(|task| {
                filter.category.as_deref().map_or(true, |category| {
                    task.category_name
                        .as_deref()
                        .is_some_and(|name| contains_ci(name, category))
                })
            })
            .filter(|task| {
                filter
                    .priority
                    .map_or(true, |band| band.matches(task.priority_score))
            })
            .filter(|task| filter.ai_suggested.map_or(true, |flag| task.ai_suggested == flag))
            .filter(|task| {
                filter.search.as_deref().map_or(true, |needle| {
                    contains_ci(&task.title, needle)
                        || contains_ci(&task.description, needle)
                        || task
                            .category_name
                            .as_deref()
                            .is_some_and(|name| contains_ci(name, needle))
                })
            })
            .cloned()
            .map(|task| derived(task, now))
            .collect();

        tasks.sort_by(|a, b| {
            b.priority_score
                .cmp(&a.priority_score)
                .then(b.created_at.cmp(&a.created_at))
        });
        tasks
    }

    fn task_stats(&self, now: DateTime<Utc>) -> TaskStats {
        let tasks: Vec<Task> = self.tasks.iter().cloned().map(|t| derived(t, now)).collect();
        let count = |pred: fn(&Task) -> bool| tasks.iter().filter(|t| pred(t)).count() as u64;

        TaskStats {
            total_tasks: tasks.len() as u64,
            completed_tasks: count(|t| t.status == TaskStatus::Completed),
            pending_tasks: count(|t| t.status == TaskStatus::Pending),
            in_progress_tasks: count(|t| t.status == TaskStatus::InProgress),
            high_priority_tasks: count(|t| t.priority_score >= 8 && t.status.is_open()),
            ai_suggested_tasks: count(|t| t.ai_suggested),
            overdue_tasks: count(|t| t.is_overdue),
        }
    }

    fn list_context_entries(&self, filter: &ContextFilter, now: DateTime<Utc>) -> Vec<ContextEntry> {
        let mut entries: Vec<ContextEntry> = self
            .context_entries
            .iter()
            .filter(|e| filter.source_type.map_or(true, |s| e.source_type == s))
            .filter(|e| filter.is_processed.map_or(true, |p| e.is_processed == p))
            .filter(|e| match filter.days_back {
                Some(days) => window_start(now, days).map_or(true, |start| e.timestamp >= start),
                None => true,
            })
            .filter(|e| {
                filter.search.as_deref().map_or(true, |needle| {
                    contains_ci(&e.content, needle)
                        || contains_ci(&e.processed_insights.to_string(), needle)
                })
            })
            .cloned()
            .collect();

        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    fn context_stats(&self, now: DateTime<Utc>) -> ContextStats {
        let total = self.context_entries.len() as u64;
        let processed = self.context_entries.iter().filter(|e| e.is_processed).count() as u64;
        let week_ago = now - Duration::days(7);

        let mut counts: HashMap<SourceType, u64> = HashMap::new();
        for entry in &self.context_entries {
            *counts.entry(entry.source_type).or_default() += 1;
        }
        let mut source_breakdown: Vec<SourceBreakdown> = counts
            .into_iter()
            .map(|(source_type, count)| SourceBreakdown { source_type, count })
            .collect();
        source_breakdown.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.source_type.as_str().cmp(b.source_type.as_str()))
        });

        let sentiments: Vec<f64> = self
            .context_entries
            .iter()
            .filter_map(|e| e.sentiment_score)
            .collect();
        let avg_sentiment = if sentiments.is_empty() {
            0.0
        } else {
            sentiments.iter().sum::<f64>() / sentiments.len() as f64
        };

        let processing_rate = if total > 0 {
            (processed as f64 / total as f64 * 10_000.0).round() / 100.0
        } else {
            0.0
        };

        ContextStats {
            total_entries: total,
            processed_entries: processed,
            processing_rate,
            recent_entries: self
                .context_entries
                .iter()
                .filter(|e| e.timestamp >= week_ago)
                .count() as u64,
            source_breakdown,
            avg_sentiment,
        }
    }

    fn context_insights(&self) -> ContextInsights {
        let mut insights: Vec<Value> = Vec::new();
        let mut keyword_counts: Vec<(String, u64)> = Vec::new();

        // Oldest first so the tail holds the most recent insights
        let mut processed: Vec<&ContextEntry> =
            self.context_entries.iter().filter(|e| e.is_processed).collect();
        processed.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        for entry in processed {
            if let Some(list) = entry.processed_insights.get("insights").and_then(Value::as_array) {
                insights.extend(list.iter().cloned());
            }
            for keyword in &entry.keywords {
                match keyword_counts.iter_mut().find(|(k, _)| k == keyword) {
                    Some((_, n)) => *n += 1,
                    None => keyword_counts.push((keyword.clone(), 1)),
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts
        keyword_counts.sort_by(|a, b| b.1.cmp(&a.1));
        keyword_counts.truncate(10);

        let recent_start = insights.len().saturating_sub(10);
        ContextInsights {
            total_insights: insights.len() as u64,
            top_keywords: keyword_counts,
            recent_insights: insights.split_off(recent_start),
        }
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> ClientApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ClientApiError::Unexpected(e.to_string()))
}

#[async_trait]
impl ClientApi for MockClient {
    async fn list_tasks(&self, filter: &TaskFilter) -> ClientApiResult<ListResponse<Task>> {
        info!(?filter, "mock: list tasks");
        Ok(ListResponse::from_results(self.state().list_tasks(filter, Utc::now())))
    }

    async fn get_task(&self, id: TaskId) -> ClientApiResult<Task> {
        let state = self.state();
        Ok(derived(state.task(id)?.clone(), Utc::now()))
    }

    async fn create_task(&self, request: &TaskCreateRequest) -> ClientApiResult<Task> {
        info!(title = %request.title, "mock: create task");
        if request.title.trim().is_empty() {
            return Err(bad_request("This field may not be blank."));
        }
        Ok(self.state().insert_task(request, Utc::now()))
    }

    async fn update_task(&self, id: TaskId, request: &TaskUpdateRequest) -> ClientApiResult<Task> {
        info!(id, "mock: update task");
        let now = Utc::now();
        let mut state = self.state();

        if let Some(category) = request.category {
            if !state.categories.iter().any(|c| c.id == category) {
                return Err(bad_request(&format!(
                    "Invalid pk \"{}\" - object does not exist.",
                    category
                )));
            }
        }
        let category_name = state.category_name(request.category);

        let task = state.task_mut(id)?;
        task.title = request.title.clone();
        task.description = request.description.clone();
        task.category = request.category;
        task.category_name = category_name;
        task.priority_score = request.priority_score;
        task.deadline = request.deadline;
        task.status = request.status;
        task.ai_suggested = request.ai_suggested;
        task.ai_insights = request.ai_insights.clone();
        task.ai_enhanced_description = request.ai_enhanced_description.clone();
        task.updated_at = now;

        Ok(derived(task.clone(), now))
    }

    async fn delete_task(&self, id: TaskId) -> ClientApiResult<()> {
        info!(id, "mock: delete task");
        let mut state = self.state();
        state.task(id)?;
        state.tasks.retain(|t| t.id != id);
        Ok(())
    }

    async fn task_stats(&self) -> ClientApiResult<TaskStats> {
        Ok(self.state().task_stats(Utc::now()))
    }

    async fn toggle_task_status(&self, id: TaskId) -> ClientApiResult<Task> {
        info!(id, "mock: toggle task status");
        let now = Utc::now();
        let mut state = self.state();
        let task = state.task_mut(id)?;
        task.status = task.status.toggled();
        task.updated_at = now;
        Ok(derived(task.clone(), now))
    }

    async fn list_categories(&self) -> ClientApiResult<Vec<Category>> {
        let mut categories = self.state().categories.clone();
        categories.sort_by(|a, b| {
            b.usage_frequency
                .cmp(&a.usage_frequency)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(categories)
    }

    async fn list_context_entries(
        &self,
        filter: &ContextFilter,
    ) -> ClientApiResult<ListResponse<ContextEntry>> {
        info!(?filter, "mock: list context entries");
        Ok(ListResponse::from_results(
            self.state().list_context_entries(filter, Utc::now()),
        ))
    }

    async fn create_context_entry(
        &self,
        request: &ContextEntryCreateRequest,
    ) -> ClientApiResult<ContextEntry> {
        info!(source_type = %request.source_type, "mock: save context entry");
        if request.content.trim().is_empty() {
            return Err(bad_request("This field may not be blank."));
        }
        Ok(self.state().insert_context_entry(request, Utc::now()))
    }

    async fn context_stats(&self) -> ClientApiResult<Value> {
        to_value(&self.state().context_stats(Utc::now()))
    }

    async fn context_insights(&self) -> ClientApiResult<Value> {
        to_value(&self.state().context_insights())
    }

    async fn reprocess_context_entry(&self, id: ContextEntryId) -> ClientApiResult<Value> {
        info!(id, "mock: reprocess context entry");
        let state = self.state();
        if !state.context_entries.iter().any(|e| e.id == id) {
            return Err(ClientApiError::NotFound(format!("context entry {}", id)));
        }
        to_value(&ReprocessResponse {
            status: Some("processing started".to_string()),
            error: None,
        })
    }

    async fn enhance_task(&self, request: &EnhanceTaskRequest) -> ClientApiResult<AiEnhancement> {
        info!(title = %request.title, "mock: AI enhancement requested");
        if request.title.is_empty() {
            return Err(bad_request("Title is required"));
        }
        Ok(AiEnhancement {
            priority: 7,
            suggested_deadline: Some("2025-01-10".to_string()),
            enhanced_description: "Complete project presentation with quarterly metrics, budget analysis, and future roadmap for the Q4 review meeting. Include performance charts and stakeholder feedback.".to_string(),
            suggested_categories: vec![
                "Work".to_string(),
                "Presentation".to_string(),
                "Quarterly Review".to_string(),
            ],
            insights: "Based on your calendar, this should be high priority. Similar tasks usually take 2-3 days to complete properly.".to_string(),
        })
    }

    async fn prioritize_tasks(
        &self,
        task_ids: &[TaskId],
    ) -> ClientApiResult<PrioritizeTasksResponse> {
        info!(?task_ids, "mock: AI prioritization requested");
        if task_ids.is_empty() {
            return Err(bad_request("task_ids list is required"));
        }
        let now = Utc::now();
        let mut prioritized: Vec<Task> = self
            .state()
            .tasks
            .iter()
            .filter(|t| task_ids.contains(&t.id))
            .cloned()
            .map(|t| derived(t, now))
            .collect();
        prioritized.sort_by(|a, b| b.priority_score.cmp(&a.priority_score));

        Ok(PrioritizeTasksResponse {
            prioritized_tasks: prioritized,
            reasoning: "Tasks prioritized using AI analysis".to_string(),
        })
    }

    async fn analyze_context(&self, content: &str, source_type: SourceType) -> ClientApiResult<Value> {
        info!(%source_type, "mock: analyzing context");
        if content.is_empty() {
            return Err(bad_request("Content is required"));
        }
        Ok(json!({
            "extracted_tasks": [
                {"title": "Prepare quarterly report", "priority": 9, "category": "Work", "deadline": "2025-01-05"},
                {"title": "Client meeting preparation", "priority": 8, "category": "Work", "deadline": "2025-01-05"}
            ],
            "insights": [
                "High urgency detected based on \"tomorrow\" reference",
                "Client-related context suggests work priority",
                "Multiple related tasks identified"
            ],
            "suggested_actions": [
                "Create high-priority task for quarterly report",
                "Block calendar time for meeting preparation",
                "Set reminder for client meeting"
            ]
        }))
    }

    async fn ai_capabilities(&self) -> ClientApiResult<Value> {
        to_value(&AiCapabilities {
            available_providers: vec![AiProvider {
                name: "Rule-based Fallback".to_string(),
                provider_type: "local".to_string(),
                status: "available".to_string(),
            }],
            features: [
                "context_analysis",
                "task_enhancement",
                "task_prioritization",
                "sentiment_analysis",
                "keyword_extraction",
            ]
            .into_iter()
            .map(|f| (f.to_string(), true))
            .collect(),
            status: "operational".to_string(),
        })
    }
}
