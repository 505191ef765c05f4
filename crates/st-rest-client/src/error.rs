//! Error types for the REST API client

use reqwest::StatusCode;
use st_client_api::ClientApiError;
use thiserror::Error;

/// Errors that can occur when using the REST API client
#[derive(Debug, Error)]
pub enum RestClientError {
    /// The exchange could not complete: offline, DNS, refused, reset, timeout
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A response arrived with a non-success status
    #[error("HTTP error! status: {status}")]
    Status { status: StatusCode, body: String },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Invalid header: {0}")]
    Header(String),
}

impl RestClientError {
    /// Status code of a protocol failure, `None` when no response was received
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RestClientError::Status { status, .. } => Some(*status),
            RestClientError::Http(err) => err.status(),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RestClientError::Http(_))
    }

    pub fn is_status(&self) -> bool {
        matches!(self, RestClientError::Status { .. })
    }
}

impl From<RestClientError> for ClientApiError {
    fn from(err: RestClientError) -> Self {
        match err {
            RestClientError::Status { status, body } => ClientApiError::Status {
                status: status.as_u16(),
                message: body,
            },
            RestClientError::Http(err) => ClientApiError::Transport(err.to_string()),
            other => ClientApiError::Unexpected(other.to_string()),
        }
    }
}

/// Result type alias for REST client operations
pub type RestClientResult<T> = Result<T, RestClientError>;
