//! Build-task side of commit baseline resolution.
//!
//! A [`Project`] carries string properties and the registered
//! [`PerformanceTest`]s. [`DetermineCommitBaseline`] inspects them, asks git
//! for a fork-point baseline when needed, and publishes the result through a
//! [`Property`].

/// Predicates deciding whether a fork-point baseline is needed.
pub mod conditions;
/// The commit baseline task.
pub mod determine;
/// Error types for task execution.
pub mod error;
/// Projects and their performance tests.
pub mod project;
/// Mutable, initially absent task properties.
pub mod property;

pub use conditions::{
    all_performance_tests_have_default_baselines, any_explicitly_set_commit_baseline,
    current_branch_is_protected, fork_point_commit_required,
};
pub use determine::{DetermineCommitBaseline, TaskOutcome};
pub use error::{Result, TaskError};
pub use project::{PerformanceTest, Project};
pub use property::Property;
