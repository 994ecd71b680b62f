//! Error types for the core module.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while managing projects and stored data.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Project not found: {0}")]
    ProjectNotFound(u64),

    #[error("Invalid project: {0}")]
    InvalidProject(String),

    #[error("Progress must be between 0 and 100, got {0}")]
    InvalidProgress(i64),

    #[error("Unknown project status: {0}")]
    UnknownStatus(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
