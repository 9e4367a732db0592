//! Fork-point resolution against real throwaway git repositories.

#![cfg_attr(
    test,
    allow(
        clippy::tests_outside_test_module,
        clippy::missing_panics_doc,
        clippy::print_stderr,
        reason = "Test file allows"
    )
)]

use baseline_core::GitConfig;
use baseline_git::{ForkPoint, ForkPointBranch, SystemGit, resolve_fork_point_baseline};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run git in `dir`, failing the test on a non-zero exit.
fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=Baseline Tests",
            "-c",
            "user.email=baseline@example.com",
            "-c",
            "commit.gpgsign=false",
            "-c",
            "init.defaultBranch=master",
        ])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap_or_else(|err| panic!("failed to run git {args:?}: {err}"));
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .is_ok_and(|output| output.status.success())
}

fn commit_version(dir: &Path, version: &str) -> String {
    fs::write(dir.join("version.txt"), format!("{version}\n"))
        .unwrap_or_else(|err| panic!("failed to write version.txt: {err}"));
    git(dir, &["add", "version.txt"]);
    git(dir, &["commit", "-q", "-m", &format!("Version {version}")]);
    git(dir, &["rev-parse", "HEAD"])
}

/// Upstream history:
///
/// ```text
/// master:  A(5.0) --- M(5.2)
///            \
/// release:    R(5.1)
/// ```
struct Upstream {
    _temp: TempDir,
    work: PathBuf,
    base: String,
    master_tip: String,
    release_tip: String,
}

fn upstream() -> Upstream {
    let temp = TempDir::new().unwrap_or_else(|err| panic!("temp dir: {err}"));
    let origin = temp.path().join("origin");
    fs::create_dir(&origin).unwrap_or_else(|err| panic!("create origin: {err}"));

    git(&origin, &["init", "-q"]);
    let base = commit_version(&origin, "5.0");
    git(&origin, &["checkout", "-q", "-b", "release"]);
    let release_tip = commit_version(&origin, "5.1");
    git(&origin, &["checkout", "-q", "master"]);
    let master_tip = commit_version(&origin, "5.2");

    let work = temp.path().join("work");
    let origin_str = origin.to_string_lossy().to_string();
    let work_str = work.to_string_lossy().to_string();
    git(temp.path(), &["clone", "-q", &origin_str, &work_str]);

    Upstream {
        _temp: temp,
        work,
        base,
        master_tip,
        release_tip,
    }
}

fn feature_commit(work: &Path) {
    fs::write(work.join("feature.txt"), "faster\n")
        .unwrap_or_else(|err| panic!("failed to write feature.txt: {err}"));
    git(work, &["add", "feature.txt"]);
    git(work, &["commit", "-q", "-m", "Feature work"]);
}

#[test]
fn test_branch_from_master_uses_master_fork_point() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }
    let repo = upstream();
    git(&repo.work, &["checkout", "-q", "-b", "feature", "origin/master"]);
    feature_commit(&repo.work);

    let runner = SystemGit::new(&repo.work);
    let config = GitConfig::default();

    let fork_point = match ForkPoint::find(&runner, &config) {
        Ok(fork_point) => fork_point,
        Err(error) => panic!("find failed: {error}"),
    };
    assert_eq!(fork_point.master_commit, repo.master_tip);
    assert_eq!(fork_point.release_commit, repo.base);
    assert_eq!(fork_point.selected, ForkPointBranch::Master);

    let baseline = match resolve_fork_point_baseline(&runner, &config) {
        Ok(baseline) => baseline,
        Err(error) => panic!("resolve failed: {error}"),
    };
    let short = git(&repo.work, &["rev-parse", "--short", &repo.master_tip]);
    assert_eq!(baseline.to_string(), format!("5.2-commit-{short}"));
}

#[test]
fn test_branch_from_release_uses_release_fork_point() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }
    let repo = upstream();
    git(&repo.work, &["checkout", "-q", "-b", "hotfix", "origin/release"]);
    feature_commit(&repo.work);

    let runner = SystemGit::new(&repo.work);
    let baseline = match resolve_fork_point_baseline(&runner, &GitConfig::default()) {
        Ok(baseline) => baseline,
        Err(error) => panic!("resolve failed: {error}"),
    };
    let short = git(&repo.work, &["rev-parse", "--short", &repo.release_tip]);
    assert_eq!(baseline.version(), "5.1");
    assert_eq!(baseline.commit(), short);
}

#[test]
fn test_missing_remote_branch_fails() {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return;
    }
    let repo = upstream();
    let config = GitConfig {
        release_branch: "does-not-exist".to_owned(),
        ..GitConfig::default()
    };

    if let Ok(baseline) = resolve_fork_point_baseline(&SystemGit::new(&repo.work), &config) {
        panic!("expected a missing branch error, got {baseline}");
    }
}
