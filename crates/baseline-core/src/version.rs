use core::fmt;
use core::result::Result as CoreResult;
use core::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Error, Result};

/// Whole-string pattern for `<digits>(.<digits>)+-commit-<lowercase hex>`
static COMMIT_BASELINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    match Regex::new(r"^(?<version>[0-9]+(?:\.[0-9]+)+)-commit-(?<commit>[a-f0-9]+)$") {
        Ok(regex) => regex,
        Err(err) => panic!("Commit baseline regex is invalid: {err}"),
    }
});

/// Check whether `text` is a `<version>-commit-<short-hash>` baseline.
///
/// The match is against the whole string, so `"5.1-commit-abc123 "` or
/// `"last,5.1-commit-abc123"` are rejected.
pub fn is_commit_baseline(text: &str) -> bool {
    COMMIT_BASELINE_REGEX.is_match(text)
}

/// A baseline pinned to a specific commit, e.g. `5.1-commit-3f2a9c1`.
///
/// Instances can only be created through [`CommitBaseline::new`] or
/// [`CommitBaseline::parse`], so the rendered string always matches the
/// commit baseline pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitBaseline {
    version: String,
    commit: String,
}

impl CommitBaseline {
    /// Build a baseline from a version string and a short commit hash.
    ///
    /// Surrounding whitespace is stripped from both parts, mirroring how
    /// command output is read.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBaseline`] if the combined identifier does not
    /// match the commit baseline pattern.
    pub fn new(version: &str, short_commit: &str) -> Result<Self> {
        Self::parse(&format!("{}-commit-{}", version.trim(), short_commit.trim()))
    }

    /// Parse an identifier of the form `<version>-commit-<short-hash>`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidBaseline`] if `text` does not match.
    pub fn parse(text: &str) -> Result<Self> {
        let captures = COMMIT_BASELINE_REGEX
            .captures(text)
            .ok_or_else(|| Error::InvalidBaseline(text.to_owned()))?;

        Ok(Self {
            version: captures["version"].to_owned(),
            commit: captures["commit"].to_owned(),
        })
    }

    /// The dotted version part, e.g. `5.1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The abbreviated commit hash part.
    pub fn commit(&self) -> &str {
        &self.commit
    }
}

impl fmt::Display for CommitBaseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-commit-{}", self.version, self.commit)
    }
}

impl FromStr for CommitBaseline {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Self::parse(text)
    }
}

impl Serialize for CommitBaseline {
    fn serialize<S>(&self, serializer: S) -> CoreResult<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CommitBaseline {
    fn deserialize<D>(deserializer: D) -> CoreResult<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(DeError::custom)
    }
}
