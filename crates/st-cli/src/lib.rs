//! Smart Todo CLI library

pub mod ai;
pub mod backend;
pub mod context;
pub mod output;
pub mod task;

use anyhow::Result;
use st_client_api::ClientApi;
use tracing_subscriber::EnvFilter;

use crate::output::Output;

// Re-export CLI types for testing
pub use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "st")]
#[command(about = "Smart Todo CLI")]
#[command(version, author, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub backend: backend::BackendArgs,

    /// Print the raw JSON payload instead of a summary
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Task management commands
    Task {
        #[command(subcommand)]
        subcommand: task::TaskCommands,
    },
    /// List task categories
    Categories,
    /// Daily context entries
    Context {
        #[command(subcommand)]
        subcommand: context::ContextCommands,
    },
    /// AI-assisted suggestions
    Ai {
        #[command(subcommand)]
        subcommand: ai::AiCommands,
    },
}

impl Commands {
    pub async fn run(self, api: &dyn ClientApi, out: &Output) -> Result<()> {
        match self {
            Commands::Task { subcommand } => subcommand.run(api, out).await,
            Commands::Categories => {
                let categories = api.list_categories().await?;
                out.emit(&categories, || {
                    categories
                        .iter()
                        .map(output::category_line)
                        .collect::<Vec<_>>()
                        .join("\n")
                })
            }
            Commands::Context { subcommand } => subcommand.run(api, out).await,
            Commands::Ai { subcommand } => subcommand.run(api, out).await,
        }
    }
}

/// Install the log subscriber; `RUST_LOG` wins over `--verbose`.
///
/// Logs go to stderr so `--json` output stays machine readable.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
