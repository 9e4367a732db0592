use std::collections::VecDeque;
use std::path::PathBuf;
use std::process::Command;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tracing::debug;

use crate::{GitError, Result};

/// Captured result of one git invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitOutput {
    /// Exit code, absent when the process was killed by a signal
    pub code: Option<i32>,
    /// Standard output with surrounding whitespace removed
    pub stdout: String,
    /// Standard error with surrounding whitespace removed
    pub stderr: String,
}

impl GitOutput {
    /// Output of a successful call printing `stdout`.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Output of a call that exited with `code`.
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether git exited with status 0.
    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Something that can execute git subcommands.
pub trait GitRunner {
    /// Run git with `args`, returning its output whatever the exit status.
    ///
    /// # Errors
    /// Returns an error only if git could not be run at all.
    fn run(&self, args: &[&str]) -> Result<GitOutput>;

    /// Run git with `args` and return its trimmed standard output.
    ///
    /// # Errors
    /// Returns [`GitError::CommandFailed`] if git exits unsuccessfully.
    fn stdout_of(&self, args: &[&str]) -> Result<String> {
        let output = self.run(args)?;
        if output.is_success() {
            Ok(output.stdout)
        } else {
            Err(GitError::CommandFailed {
                command: args.join(" "),
                code: output.code,
                stderr: output.stderr,
            })
        }
    }
}

/// Runs the system `git` binary inside a working directory.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
    work_dir: PathBuf,
}

impl SystemGit {
    /// Run `git` from `PATH` inside `work_dir`.
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: PathBuf::from("git"),
            work_dir: work_dir.into(),
        }
    }

    /// Use a specific git executable.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }
}

impl GitRunner for SystemGit {
    fn run(&self, args: &[&str]) -> Result<GitOutput> {
        let command = args.join(" ");
        debug!("Running git {command} in {}", self.work_dir.display());

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.work_dir)
            .output()
            .map_err(|source| GitError::Spawn {
                command: command.clone(),
                source,
            })?;

        let result = GitOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).trim().to_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        };

        debug!("git {command} exited with {:?}", result.code);
        Ok(result)
    }
}

/// A runner that replays canned responses in order.
///
/// Each expected call is matched against the exact argument list. A call that
/// does not match the next expectation fails with [`GitError::Unscripted`].
#[derive(Debug, Default)]
pub struct ScriptedGit {
    expected: Mutex<VecDeque<(Vec<String>, GitOutput)>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedGit {
    /// Create a runner with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expect `args` next and answer with `output`.
    #[must_use]
    pub fn expect(self, args: &[&str], output: GitOutput) -> Self {
        self.expected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back((args.iter().map(|arg| (*arg).to_owned()).collect(), output));
        self
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.expected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl GitRunner for ScriptedGit {
    fn run(&self, args: &[&str]) -> Result<GitOutput> {
        let call: Vec<String> = args.iter().map(|arg| (*arg).to_owned()).collect();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call.clone());

        let mut expected = self
            .expected
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let matches_next = expected
            .front()
            .is_some_and(|(expected_args, _)| *expected_args == call);
        if matches_next && let Some((_, output)) = expected.pop_front() {
            return Ok(output);
        }

        Err(GitError::Unscripted(expected.front().map_or_else(
            || call.join(" "),
            |(expected_args, _)| {
                format!(
                    "got `{}`, expected `{}`",
                    call.join(" "),
                    expected_args.join(" ")
                )
            },
        )))
    }
}
