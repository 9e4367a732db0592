use baseline_core::{CommitBaseline, GitConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{GitRunner, Result};

/// Which upstream branch the fork point was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ForkPointBranch {
    /// Main development branch
    Master,
    /// Release branch
    Release,
}

/// Merge bases of `HEAD` with both upstream branches and the one selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForkPoint {
    /// Merge base of `HEAD` and the remote master branch
    pub master_commit: String,
    /// Merge base of `HEAD` and the remote release branch
    pub release_commit: String,
    /// Branch whose merge base was selected
    pub selected: ForkPointBranch,
}

impl ForkPoint {
    /// Fetch the upstream branches and compute both merge bases.
    ///
    /// The release merge base wins when the master merge base is one of its
    /// ancestors, i.e. the branch was cut from release after master moved on.
    /// The ancestry check's exit status is never treated as an error.
    ///
    /// # Errors
    /// Returns an error if fetching or either merge-base lookup fails
    pub fn find<R>(git: &R, config: &GitConfig) -> Result<Self>
    where
        R: GitRunner + ?Sized,
    {
        if config.fetch {
            git.stdout_of(&[
                "fetch",
                &config.remote,
                &config.master_branch,
                &config.release_branch,
            ])?;
        } else {
            debug!("Skipping fetch of {}", config.remote);
        }

        let master_ref = format!("{}/{}", config.remote, config.master_branch);
        let release_ref = format!("{}/{}", config.remote, config.release_branch);
        let master_commit = git.stdout_of(&["merge-base", &master_ref, "HEAD"])?;
        let release_commit = git.stdout_of(&["merge-base", &release_ref, "HEAD"])?;

        let ancestry = git.run(&["merge-base", "--is-ancestor", &master_commit, &release_commit])?;
        let selected = match ancestry.code {
            Some(0) => ForkPointBranch::Release,
            Some(1) => ForkPointBranch::Master,
            code => {
                warn!(
                    "Ancestry check between {master_commit} and {release_commit} exited with {code:?}: {}",
                    ancestry.stderr
                );
                ForkPointBranch::Master
            }
        };

        debug!("Fork points: master={master_commit} release={release_commit} selected={selected:?}");
        Ok(Self {
            master_commit,
            release_commit,
            selected,
        })
    }

    /// The selected fork-point commit.
    pub fn commit(&self) -> &str {
        match self.selected {
            ForkPointBranch::Master => &self.master_commit,
            ForkPointBranch::Release => &self.release_commit,
        }
    }

    /// Read the version file at the fork point and build its baseline.
    ///
    /// # Errors
    /// Returns an error if the version file or short hash cannot be read, or
    /// if they do not form a valid commit baseline
    pub fn baseline<R>(&self, git: &R, config: &GitConfig) -> Result<CommitBaseline>
    where
        R: GitRunner + ?Sized,
    {
        let commit = self.commit();
        let version = git.stdout_of(&["show", &format!("{commit}:{}", config.version_file)])?;
        let short_commit = git.stdout_of(&["rev-parse", "--short", commit])?;
        Ok(CommitBaseline::new(&version, &short_commit)?)
    }
}

/// Compute the fork-point commit baseline for `HEAD`.
///
/// # Errors
/// Returns an error if any git call other than the ancestry check fails, or if
/// the version file does not hold a dotted version
pub fn resolve_fork_point_baseline<R>(git: &R, config: &GitConfig) -> Result<CommitBaseline>
where
    R: GitRunner + ?Sized,
{
    let fork_point = ForkPoint::find(git, config)?;
    let baseline = fork_point.baseline(git, config)?;
    info!(
        "Fork-point baseline {baseline} from {:?} commit {}",
        fork_point.selected,
        fork_point.commit()
    );
    Ok(baseline)
}
