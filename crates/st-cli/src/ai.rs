use anyhow::Result;
use clap::Subcommand;
use st_client_api::ClientApi;
use st_rest_api_contract::{typed_view, AiCapabilities, EnhanceTaskRequest, SourceType, TaskId};

use crate::output::{self, Output};

/// AI-assisted commands, all delegated to the backend
#[derive(Subcommand)]
pub enum AiCommands {
    /// Suggest priority, deadline and categories for a task idea
    Enhance {
        /// Task title
        title: String,

        #[arg(short, long, value_name = "TEXT", default_value = "")]
        description: String,

        /// Category hint
        #[arg(short, long, value_name = "NAME")]
        category: Option<String>,
    },
    /// Reorder tasks by AI-assessed priority
    Prioritize {
        /// Task ids to rank
        #[arg(required = true, value_name = "ID")]
        task_ids: Vec<TaskId>,
    },
    /// Analyze a piece of context without storing it
    Analyze {
        /// Text to analyze
        content: String,

        #[arg(short, long = "source", value_name = "TYPE", default_value = "notes")]
        source_type: SourceType,
    },
    /// Show which AI providers and features the backend offers
    Capabilities,
}

impl AiCommands {
    pub async fn run(self, api: &dyn ClientApi, out: &Output) -> Result<()> {
        match self {
            AiCommands::Enhance {
                title,
                description,
                category,
            } => {
                let request = EnhanceTaskRequest {
                    title,
                    description,
                    category,
                };
                let enhancement = api.enhance_task(&request).await?;
                out.emit(&enhancement, || output::enhancement(&enhancement))
            }
            AiCommands::Prioritize { task_ids } => {
                let response = api.prioritize_tasks(&task_ids).await?;
                out.emit(&response, || {
                    let mut lines: Vec<String> = response
                        .prioritized_tasks
                        .iter()
                        .enumerate()
                        .map(|(rank, task)| format!("{}. {}", rank + 1, output::task_line(task)))
                        .collect();
                    if !response.reasoning.is_empty() {
                        lines.push(String::new());
                        lines.push(response.reasoning.clone());
                    }
                    lines.join("\n")
                })
            }
            AiCommands::Analyze {
                content,
                source_type,
            } => {
                let analysis = api.analyze_context(&content, source_type).await?;
                out.emit(&analysis, || output::raw(&analysis))
            }
            AiCommands::Capabilities => {
                let capabilities = api.ai_capabilities().await?;
                out.emit(&capabilities, || {
                    match typed_view::<AiCapabilities>(&capabilities) {
                        Ok(view) => capabilities_summary(&view),
                        Err(_) => output::raw(&capabilities),
                    }
                })
            }
        }
    }
}

fn capabilities_summary(capabilities: &AiCapabilities) -> String {
    let mut lines = vec![format!("status: {}", capabilities.status)];
    for provider in &capabilities.available_providers {
        lines.push(format!(
            "provider: {} ({}, {})",
            provider.name, provider.provider_type, provider.status
        ));
    }
    let enabled: Vec<&str> = capabilities
        .features
        .iter()
        .filter(|(_, on)| **on)
        .map(|(name, _)| name.as_str())
        .collect();
    lines.push(format!("features: {}", enabled.join(", ")));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_capabilities_summary_lists_enabled_features() {
        let view: AiCapabilities = typed_view(&json!({
            "available_providers": [
                {"name": "Rule-based Fallback", "type": "fallback", "status": "active"}
            ],
            "features": {"task_enhancement": true, "voice_input": false},
            "status": "operational"
        }))
        .unwrap();

        assert_eq!(
            capabilities_summary(&view),
            "status: operational\nprovider: Rule-based Fallback (fallback, active)\nfeatures: task_enhancement"
        );
    }
}
