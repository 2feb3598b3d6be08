//! Error type for Digital Collections API requests.

use reqwest::StatusCode;

/// Why a listing or image request failed.
///
/// All variants are retried the same way; they differ only in diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API token not configured")]
    MissingToken,

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("malformed listing response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status associated with the failure, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            ApiError::MissingToken | ApiError::Parse(_) => None,
        }
    }
}

/// Render an optional status for "latest HTTP status" messages.
pub fn describe_status(status: Option<StatusCode>) -> String {
    match status {
        Some(status) => status.as_u16().to_string(),
        None => "none".to_string(),
    }
}
