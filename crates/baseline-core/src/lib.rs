//! Core types for commit baseline resolution.
//!
//! This crate provides the error type, the on-disk configuration and the
//! validated [`CommitBaseline`] identifier shared by the other baseline crates.

/// Configuration for git access, protected branches and default baselines.
pub mod config;
/// Error types and result definitions.
pub mod error;
/// The `<version>-commit-<hash>` baseline identifier.
pub mod version;

pub use config::{BaselineConfig, BaselinesConfig, BranchConfig, GitConfig, PerformanceTestConfig};
pub use error::{Error, Result};
pub use version::{CommitBaseline, is_commit_baseline};
