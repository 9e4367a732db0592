//! Git access for commit baseline resolution.
//!
//! All git calls go through the [`GitRunner`] trait. [`SystemGit`] shells out
//! to the `git` binary; [`ScriptedGit`] replays canned responses.

/// Error types for git invocations.
pub mod error;
/// Fork-point discovery and baseline derivation.
pub mod fork_point;
/// The [`GitRunner`] seam and its implementations.
pub mod runner;

pub use error::{GitError, Result};
pub use fork_point::{ForkPoint, ForkPointBranch, resolve_fork_point_baseline};
pub use runner::{GitOutput, GitRunner, ScriptedGit, SystemGit};
