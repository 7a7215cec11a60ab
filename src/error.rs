//! Unified error type for history extraction and lookup.

use thiserror::Error;

/// All errors that can occur while building or reading git history.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// I/O error (file read/write, directory access)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The git executable could not be spawned
    #[error("Failed to execute git: {0}. Is git installed and in PATH?")]
    GitUnavailable(#[source] std::io::Error),

    /// git ran but exited with a failure status
    #[error("git {args} failed: {stderr}")]
    GitFailed { args: String, stderr: String },

    /// git produced output that is not UTF-8
    #[error("git output is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Failed to load the persisted history artifact
    #[error("Failed to load git history from {path}: {message}")]
    ArtifactLoad {
        path: String,
        message: String,
    },
}
