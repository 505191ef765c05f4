//! Error types for API contract parsing

use thiserror::Error;

/// Errors that can occur while parsing contract values
#[derive(Debug, Error)]
pub enum ApiContractError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid task status: {0}")]
    InvalidTaskStatus(String),

    #[error("Invalid source type: {0}")]
    InvalidSourceType(String),

    #[error("Invalid priority filter: {0}")]
    InvalidPriority(String),
}
