use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use st_client_api::ClientApi;
use st_rest_api_contract::{
    CategoryId, PriorityFilter, TaskCreateRequest, TaskFilter, TaskId, TaskStatus,
    TaskUpdateRequest,
};

use crate::output::{self, Output};

/// Task-related commands
#[derive(Subcommand)]
pub enum TaskCommands {
    /// List tasks, optionally filtered
    List(TaskListArgs),
    /// Show a single task
    Get {
        /// Task id
        id: TaskId,
    },
    /// Create a new task
    Create(TaskCreateArgs),
    /// Change fields of an existing task
    Update(TaskUpdateArgs),
    /// Delete a task
    Delete {
        /// Task id
        id: TaskId,
    },
    /// Show aggregate task counts
    Stats,
    /// Flip a task between pending and completed
    Toggle {
        /// Task id
        id: TaskId,
    },
}

/// Filters for listing tasks
#[derive(Args, Default)]
pub struct TaskListArgs {
    /// Only tasks with this status (pending, in_progress, completed, cancelled)
    #[arg(long, value_name = "STATUS")]
    pub status: Option<TaskStatus>,

    /// Only tasks in this category
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Priority band (high, medium, low)
    #[arg(long, value_name = "BAND")]
    pub priority: Option<PriorityFilter>,

    /// Only AI-suggested tasks (true/false)
    #[arg(long = "ai-suggested", value_name = "BOOL")]
    pub ai_suggested: Option<bool>,

    /// Text to search for in title and description
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
}

/// Arguments for creating a task
#[derive(Args)]
pub struct TaskCreateArgs {
    /// Task title
    #[arg(value_name = "TITLE")]
    pub title: String,

    #[arg(short, long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Category name, created on the server when missing
    #[arg(short, long, value_name = "NAME")]
    pub category: Option<String>,

    /// Priority score from 1 to 10
    #[arg(short, long, value_name = "SCORE", value_parser = clap::value_parser!(i32).range(1..=10))]
    pub priority: Option<i32>,

    /// Deadline as RFC 3339 or YYYY-MM-DD
    #[arg(long, value_name = "WHEN", value_parser = parse_deadline)]
    pub deadline: Option<DateTime<Utc>>,

    #[arg(long, value_name = "STATUS")]
    pub status: Option<TaskStatus>,
}

/// Arguments for updating a task
#[derive(Args)]
pub struct TaskUpdateArgs {
    /// Task id
    pub id: TaskId,

    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    #[arg(short, long, value_name = "TEXT")]
    pub description: Option<String>,

    /// Category id
    #[arg(short, long, value_name = "ID", conflicts_with = "no_category")]
    pub category: Option<CategoryId>,

    /// Remove the task from its category
    #[arg(long = "no-category")]
    pub no_category: bool,

    /// Priority score from 1 to 10
    #[arg(short, long, value_name = "SCORE", value_parser = clap::value_parser!(i32).range(1..=10))]
    pub priority: Option<i32>,

    /// Deadline as RFC 3339 or YYYY-MM-DD
    #[arg(long, value_name = "WHEN", value_parser = parse_deadline, conflicts_with = "no_deadline")]
    pub deadline: Option<DateTime<Utc>>,

    /// Remove the deadline
    #[arg(long = "no-deadline")]
    pub no_deadline: bool,

    #[arg(long, value_name = "STATUS")]
    pub status: Option<TaskStatus>,
}

impl TaskCommands {
    /// Execute the task command
    pub async fn run(self, api: &dyn ClientApi, out: &Output) -> Result<()> {
        match self {
            TaskCommands::List(args) => {
                let page = api.list_tasks(&args.filter()).await?;
                out.emit(&page, || output::task_list(&page))
            }
            TaskCommands::Get { id } => {
                let task = api.get_task(id).await?;
                out.emit(&task, || output::task_detail(&task))
            }
            TaskCommands::Create(args) => {
                let task = api.create_task(&args.request()).await?;
                out.emit(&task, || format!("Created {}", output::task_line(&task)))
            }
            TaskCommands::Update(args) => args.run(api, out).await,
            TaskCommands::Delete { id } => {
                api.delete_task(id).await?;
                out.emit(&serde_json::json!({ "deleted": id }), || {
                    format!("Deleted task #{}", id)
                })
            }
            TaskCommands::Stats => {
                let stats = api.task_stats().await?;
                out.emit(&stats, || output::task_stats(&stats))
            }
            TaskCommands::Toggle { id } => {
                let task = api.toggle_task_status(id).await?;
                out.emit(&task, || output::task_line(&task))
            }
        }
    }
}

impl TaskListArgs {
    pub fn filter(&self) -> TaskFilter {
        TaskFilter {
            status: self.status,
            category: self.category.clone(),
            priority: self.priority,
            ai_suggested: self.ai_suggested,
            search: self.search.clone(),
        }
    }
}

impl TaskCreateArgs {
    pub fn request(&self) -> TaskCreateRequest {
        TaskCreateRequest {
            title: self.title.clone(),
            description: self.description.clone(),
            category_name: self.category.clone(),
            priority_score: self.priority,
            deadline: self.deadline,
            status: self.status,
        }
    }
}

impl TaskUpdateArgs {
    /// Fetch the task, apply the changes and send the full record back
    pub async fn run(self, api: &dyn ClientApi, out: &Output) -> Result<()> {
        let current = api
            .get_task(self.id)
            .await
            .with_context(|| format!("Failed to load task #{}", self.id))?;

        let request = self.apply(TaskUpdateRequest::from(&current));
        let task = api.update_task(self.id, &request).await?;
        out.emit(&task, || format!("Updated {}", output::task_line(&task)))
    }

    pub fn apply(&self, mut request: TaskUpdateRequest) -> TaskUpdateRequest {
        if let Some(title) = &self.title {
            request.title = title.clone();
        }
        if let Some(description) = &self.description {
            request.description = description.clone();
        }
        if self.no_category {
            request.category = None;
        } else if let Some(category) = self.category {
            request.category = Some(category);
        }
        if let Some(priority) = self.priority {
            request.priority_score = priority;
        }
        if self.no_deadline {
            request.deadline = None;
        } else if let Some(deadline) = self.deadline {
            request.deadline = Some(deadline);
        }
        if let Some(status) = self.status {
            request.status = status;
        }
        request
    }
}

/// Parse a deadline given as RFC 3339 or as a plain date (midnight UTC)
pub fn parse_deadline(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(when) = DateTime::parse_from_rfc3339(value) {
        return Ok(when.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid deadline '{}', expected RFC 3339 or YYYY-MM-DD", value))
}
