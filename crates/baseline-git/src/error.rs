use baseline_core::Error as CoreError;
use std::io;
use std::result::Result as StdResult;
use thiserror::Error;

/// Result type for git operations.
pub type Result<T> = StdResult<T, GitError>;

/// Errors raised while running git.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git process could not be started.
    #[error("Failed to run `git {command}`: {source}")]
    Spawn {
        /// Arguments passed to git, space separated
        command: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Git exited unsuccessfully.
    #[error("`git {command}` failed with exit code {}: {stderr}", exit_code_label(.code))]
    CommandFailed {
        /// Arguments passed to git, space separated
        command: String,
        /// Exit code, absent when killed by a signal
        code: Option<i32>,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// Git output could not be turned into a baseline.
    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    /// A scripted runner received a call it was not prepared for.
    #[error("Unexpected git call: {0}")]
    Unscripted(String),
}

#[allow(clippy::ref_option, reason = "thiserror passes fields by reference")]
fn exit_code_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_owned(), |value| value.to_string())
}
