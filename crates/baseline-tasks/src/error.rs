use baseline_git::GitError;
use std::result::Result as StdResult;
use thiserror::Error;

/// Result type for task execution.
pub type Result<T> = StdResult<T, TaskError>;

/// Errors raised by build tasks.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A git call failed.
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// A property was read before it was set.
    #[error("Property '{0}' has no value")]
    MissingProperty(String),
}
