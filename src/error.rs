// src/error.rs
//! Application error types with structured error handling.
//!
//! Only a few of these ever escape a harvest: a failed page is logged and
//! skipped by the tracker, so most variants surface either from
//! configuration or from writing the output artifact.

use thiserror::Error;

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("JIRA returned HTTP {status}: {}", describe_messages(.messages))]
    JiraService {
        status: reqwest::StatusCode,
        messages: Vec<String>,
    },

    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode database as JSON: {0}")]
    JsonEncode(#[from] serde_json::Error),

    #[error("This tracker has already completed a harvest")]
    HarvestAlreadyRun,

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),
}

fn describe_messages(messages: &[String]) -> String {
    if messages.is_empty() {
        "no error message".to_string()
    } else {
        messages.join("; ")
    }
}

impl AppError {
    /// Whether this error came from the network or the server rather than
    /// from local configuration or I/O.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::NetworkFailure(_) | Self::JiraService { .. } | Self::MalformedResponse { .. }
        )
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
