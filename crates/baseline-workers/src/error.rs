use core::fmt;
use std::io;
use std::result::Result as StdResult;

use thiserror::Error;

/// Result type for worker operations.
pub type Result<T> = StdResult<T, WorkerError>;

/// A unit of work that did not complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkFailure {
    /// Display name of the unit of work
    pub display_name: String,
    /// Rendered error
    pub message: String,
}

impl fmt::Display for WorkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.display_name, self.message)
    }
}

/// Errors raised while executing work.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Walking a source directory failed.
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// A unit of work panicked.
    #[error("Work panicked: {0}")]
    Panicked(String),

    /// A unit of work was cancelled before completing.
    #[error("Work was cancelled")]
    Cancelled,

    /// The executor can no longer accept work.
    #[error("Worker executor is closed")]
    Closed,

    /// One or more submitted units of work failed.
    #[error("{} work item(s) failed: {}", .0.len(), join_failures(.0))]
    Failed(Vec<WorkFailure>),

    /// An operation does not apply to the value it was called on.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

fn join_failures(failures: &[WorkFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
