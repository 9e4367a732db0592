//! Worker execution with a selectable isolation level.
//!
//! Units of work implement [`WorkAction`] and are handed to a
//! [`WorkerExecutor`], which runs them concurrently and reports every
//! outcome. [`ReverseFiles`] is a complete task built on top: it reverses the
//! contents of each source file in its own unit of work.

/// The unit-of-work trait.
pub mod action;
/// Error types for worker execution.
pub mod error;
/// Bounded concurrent executor.
pub mod executor;
/// Isolation levels and per-submission settings.
pub mod isolation;
/// The file reversing task.
pub mod reverse;
/// Subjects of file transformations.
pub mod subject;

pub use action::WorkAction;
pub use error::{Result, WorkFailure, WorkerError};
pub use executor::{WorkReport, WorkerExecutor};
pub use isolation::{IsolationMode, WorkerSpec};
pub use reverse::{ReverseFile, ReverseFiles};
pub use subject::TransformSubject;
