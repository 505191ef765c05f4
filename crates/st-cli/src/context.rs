use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use st_client_api::ClientApi;
use st_rest_api_contract::{
    typed_view, ContextEntryCreateRequest, ContextEntryId, ContextFilter, ContextInsights,
    ContextStats, ReprocessResponse, SourceType,
};
use std::path::PathBuf;

use crate::output::{self, Output};

/// Context entry commands
#[derive(Subcommand)]
pub enum ContextCommands {
    /// List context entries, optionally filtered
    List(ContextListArgs),
    /// Record a new context entry
    Add(ContextAddArgs),
    /// Show processing statistics
    Stats,
    /// Show keywords and insights gathered so far
    Insights,
    /// Run the analysis of an entry again
    Reprocess {
        /// Context entry id
        id: ContextEntryId,
    },
}

#[derive(Args, Default)]
pub struct ContextListArgs {
    /// Source type (whatsapp, email, notes, calendar, other)
    #[arg(long = "source", value_name = "TYPE")]
    pub source_type: Option<SourceType>,

    /// Only processed or unprocessed entries (true/false)
    #[arg(long = "processed", value_name = "BOOL")]
    pub is_processed: Option<bool>,

    /// Only entries from the last N days
    #[arg(long = "days-back", value_name = "DAYS")]
    pub days_back: Option<u32>,

    /// Text to search for in the content
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct ContextAddArgs {
    /// Entry content
    #[arg(value_name = "CONTENT", required_unless_present = "file", conflicts_with = "file")]
    pub content: Option<String>,

    /// Read the content from FILE
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Where the content came from
    #[arg(short, long = "source", value_name = "TYPE", default_value = "notes")]
    pub source_type: SourceType,
}

impl ContextCommands {
    pub async fn run(self, api: &dyn ClientApi, out: &Output) -> Result<()> {
        match self {
            ContextCommands::List(args) => {
                let page = api.list_context_entries(&args.filter()).await?;
                out.emit(&page, || output::context_list(&page))
            }
            ContextCommands::Add(args) => {
                let entry = api.create_context_entry(&args.request()?).await?;
                out.emit(&entry, || format!("Added {}", output::context_line(&entry)))
            }
            ContextCommands::Stats => {
                let stats = api.context_stats().await?;
                out.emit(&stats, || match typed_view::<ContextStats>(&stats) {
                    Ok(view) => stats_summary(&view),
                    Err(_) => output::raw(&stats),
                })
            }
            ContextCommands::Insights => {
                let insights = api.context_insights().await?;
                out.emit(&insights, || match typed_view::<ContextInsights>(&insights) {
                    Ok(view) => insights_summary(&view),
                    Err(_) => output::raw(&insights),
                })
            }
            ContextCommands::Reprocess { id } => {
                let response = api.reprocess_context_entry(id).await?;
                out.emit(&response, || {
                    match typed_view::<ReprocessResponse>(&response) {
                        Ok(ReprocessResponse {
                            error: Some(error), ..
                        }) => format!("Reprocessing #{} failed: {}", id, error),
                        Ok(ReprocessResponse {
                            status: Some(status),
                            ..
                        }) => format!("#{}: {}", id, status),
                        _ => output::raw(&response),
                    }
                })
            }
        }
    }
}

impl ContextListArgs {
    pub fn filter(&self) -> ContextFilter {
        ContextFilter {
            source_type: self.source_type,
            is_processed: self.is_processed,
            days_back: self.days_back,
            search: self.search.clone(),
        }
    }
}

impl ContextAddArgs {
    pub fn request(&self) -> Result<ContextEntryCreateRequest> {
        let content = match (&self.content, &self.file) {
            (Some(content), _) => content.clone(),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            (None, None) => anyhow::bail!("Either CONTENT or --file is required"),
        };

        if content.trim().is_empty() {
            anyhow::bail!("Context content cannot be empty");
        }

        Ok(ContextEntryCreateRequest {
            content,
            source_type: self.source_type,
        })
    }
}

fn stats_summary(stats: &ContextStats) -> String {
    let mut lines = vec![
        format!("entries: {}", stats.total_entries),
        format!(
            "processed: {} ({:.0}%)",
            stats.processed_entries, stats.processing_rate
        ),
        format!("last 7 days: {}", stats.recent_entries),
        format!("average sentiment: {:.2}", stats.avg_sentiment),
    ];
    for source in &stats.source_breakdown {
        lines.push(format!("  {}: {}", source.source_type, source.count));
    }
    lines.join("\n")
}

fn insights_summary(insights: &ContextInsights) -> String {
    let keywords = insights
        .top_keywords
        .iter()
        .map(|(word, count)| format!("{} ({})", word, count))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "insights: {}\ntop keywords: {}",
        insights.total_insights,
        if keywords.is_empty() { "-" } else { keywords.as_str() }
    )
}
