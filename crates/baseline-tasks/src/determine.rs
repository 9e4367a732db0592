use baseline_core::{BaselineConfig, CommitBaseline};
use baseline_git::{GitRunner, resolve_fork_point_baseline};
use serde::Serialize;
use tracing::{debug, info};

use crate::conditions::{any_explicitly_set_commit_baseline, fork_point_commit_required};
use crate::{Project, Property, Result};

/// Property name under which the resolved baseline is published.
pub const COMMIT_BASELINE_VERSION: &str = "commitBaselineVersion";

/// What a [`DetermineCommitBaseline`] run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "baseline", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// Neither a fork point was needed nor an explicit commit baseline set
    Skipped,
    /// A fork-point baseline was computed and applied to every test
    ForkPoint(CommitBaseline),
    /// An already configured commit baseline was reused
    Explicit(CommitBaseline),
}

impl TaskOutcome {
    /// The baseline published by the run, if any.
    pub fn baseline(&self) -> Option<&CommitBaseline> {
        match self {
            Self::Skipped => None,
            Self::ForkPoint(baseline) | Self::Explicit(baseline) => Some(baseline),
        }
    }
}

/// Determines the commit baseline performance tests compare against.
///
/// The task only runs when a fork-point baseline is required or some test
/// already names a commit baseline. Its result is published through
/// [`DetermineCommitBaseline::commit_baseline_version`].
#[derive(Debug, Clone)]
pub struct DetermineCommitBaseline {
    config: BaselineConfig,
    commit_baseline_version: Property<CommitBaseline>,
}

impl DetermineCommitBaseline {
    /// Create the task with the given configuration.
    pub fn new(config: BaselineConfig) -> Self {
        Self {
            config,
            commit_baseline_version: Property::new(COMMIT_BASELINE_VERSION),
        }
    }

    /// The configuration the task decides with.
    pub fn config(&self) -> &BaselineConfig {
        &self.config
    }

    /// The resolved baseline, absent until the task action ran.
    pub fn commit_baseline_version(&self) -> &Property<CommitBaseline> {
        &self.commit_baseline_version
    }

    /// Whether the task action should run for `project`.
    pub fn only_if(&self, project: &Project) -> bool {
        fork_point_commit_required(project, &self.config)
            || any_explicitly_set_commit_baseline(project).is_some()
    }

    /// The task action.
    ///
    /// When a fork point is required the baseline is computed from git and
    /// written into every performance test; otherwise the first explicit
    /// commit baseline is published as is.
    ///
    /// # Errors
    /// Returns an error if the fork-point lookup fails
    pub fn determine_fork_point_commit_baseline<R>(
        &mut self,
        project: &mut Project,
        git: &R,
    ) -> Result<TaskOutcome>
    where
        R: GitRunner + ?Sized,
    {
        if fork_point_commit_required(project, &self.config) {
            let baseline = resolve_fork_point_baseline(git, &self.config.git)?;
            self.commit_baseline_version.set(baseline.clone());

            let rendered = baseline.to_string();
            for test in project.performance_tests_mut() {
                debug!("Setting baselines of {} to {rendered}", test.name);
                test.baselines = Some(rendered.clone());
            }
            Ok(TaskOutcome::ForkPoint(baseline))
        } else {
            let explicit = any_explicitly_set_commit_baseline(project);
            self.commit_baseline_version.set_optional(explicit.clone());
            Ok(explicit.map_or(TaskOutcome::Skipped, TaskOutcome::Explicit))
        }
    }

    /// Evaluate [`Self::only_if`] and run the action when it holds.
    ///
    /// # Errors
    /// Returns an error if the task action fails
    pub fn run<R>(&mut self, project: &mut Project, git: &R) -> Result<TaskOutcome>
    where
        R: GitRunner + ?Sized,
    {
        if !self.only_if(project) {
            info!("Skipping commit baseline: protected branch or explicit non-commit baselines");
            return Ok(TaskOutcome::Skipped);
        }

        let outcome = self.determine_fork_point_commit_baseline(project, git)?;
        if let Some(baseline) = outcome.baseline() {
            info!("Commit baseline version: {baseline}");
        }
        Ok(outcome)
    }
}
