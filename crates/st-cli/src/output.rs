//! Human readable rendering of API payloads

use anyhow::Result;
use serde::Serialize;
use st_rest_api_contract::*;

/// Prints either the raw JSON payload or a summary
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn emit<T: Serialize>(&self, value: &T, summary: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let text = summary();
            if !text.is_empty() {
                println!("{}", text);
            }
        }
        Ok(())
    }
}

pub fn task_line(task: &Task) -> String {
    let mut line = format!(
        "#{} [{}] P{} {}",
        task.id, task.status, task.priority_score, task.title
    );
    if let Some(category) = &task.category_name {
        line.push_str(&format!(" ({})", category));
    }
    if let Some(deadline) = task.deadline {
        line.push_str(&format!(" due {}", deadline.format("%Y-%m-%d")));
    }
    if task.is_overdue {
        line.push_str(" OVERDUE");
    }
    if task.ai_suggested {
        line.push_str(" *ai");
    }
    line
}

pub fn task_detail(task: &Task) -> String {
    let mut lines = vec![task_line(task)];
    if !task.description.is_empty() {
        lines.push(format!("  {}", task.description));
    }
    lines.push(format!("  priority: {} ({})", task.priority_score, task.priority_level));
    if !task.ai_enhanced_description.is_empty() {
        lines.push(format!("  enhanced: {}", task.ai_enhanced_description));
    }
    if !task.ai_insights.is_empty() {
        lines.push(format!("  insights: {}", task.ai_insights));
    }
    lines.join("\n")
}

pub fn task_list(page: &ListResponse<Task>) -> String {
    let mut lines: Vec<String> = page.results.iter().map(task_line).collect();
    lines.push(format!("{} task(s)", page.count));
    lines.join("\n")
}

pub fn task_stats(stats: &TaskStats) -> String {
    format!(
        "total: {}\npending: {}\nin progress: {}\ncompleted: {}\nhigh priority: {}\nai suggested: {}\noverdue: {}",
        stats.total_tasks,
        stats.pending_tasks,
        stats.in_progress_tasks,
        stats.completed_tasks,
        stats.high_priority_tasks,
        stats.ai_suggested_tasks,
        stats.overdue_tasks,
    )
}

pub fn category_line(category: &Category) -> String {
    format!(
        "#{} {} (used {} times)",
        category.id, category.name, category.usage_frequency
    )
}

pub fn context_line(entry: &ContextEntry) -> String {
    let state = if !entry.processing_error.is_empty() {
        "error"
    } else if entry.is_processed {
        "processed"
    } else {
        "pending"
    };
    format!(
        "#{} [{}] {} {} - {}",
        entry.id,
        entry.source_type,
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        state,
        entry.preview
    )
}

pub fn context_list(page: &ListResponse<ContextEntry>) -> String {
    let mut lines: Vec<String> = page.results.iter().map(context_line).collect();
    lines.push(format!("{} entr{}", page.count, if page.count == 1 { "y" } else { "ies" }));
    lines.join("\n")
}

pub fn enhancement(enhancement: &AiEnhancement) -> String {
    let mut lines = vec![format!("Priority: {}/10", enhancement.priority)];
    if let Some(deadline) = &enhancement.suggested_deadline {
        lines.push(format!("Suggested deadline: {}", deadline));
    }
    if !enhancement.suggested_categories.is_empty() {
        lines.push(format!(
            "Suggested categories: {}",
            enhancement.suggested_categories.join(", ")
        ));
    }
    if !enhancement.enhanced_description.is_empty() {
        lines.push(format!("Enhanced description: {}", enhancement.enhanced_description));
    }
    if !enhancement.insights.is_empty() {
        lines.push(format!("Insights: {}", enhancement.insights));
    }
    lines.join("\n")
}

/// Opaque payloads are shown as indented JSON in both modes
pub fn raw(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
