//! Error types for dfcheck
//!
//! Every failure is terminal to the operation that raised it and is
//! surfaced to the user as display text, never propagated past the
//! workflow controller. The `Auth`/`Detection`/`Validation` variants
//! display the bare message because the surfaced text must match the
//! service's `detail` field exactly when one was provided.

use thiserror::Error;

/// Result type for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Workflow error taxonomy
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Rejected file type; raised locally, never reaches the network
    #[error("{0}")]
    Validation(String),

    /// Login or registration failure
    #[error("{0}")]
    Auth(String),

    /// Any of the three detection pipeline stages failing
    #[error("{0}")]
    Detection(String),

    /// Non-HTTP failure (network unreachable, malformed body, local I/O).
    /// The underlying cause is kept for logging but the user sees a
    /// generic message.
    #[error("Something went wrong")]
    Unexpected(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for WorkflowError {
    fn from(err: reqwest::Error) -> Self {
        WorkflowError::Unexpected(err.to_string())
    }
}
