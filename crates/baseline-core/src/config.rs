//! Configuration types for git access, branch protection and baselines.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "baseline.toml";

/// Baseline list value meaning "whatever the test harness defaults to".
pub const DEFAULTS_BASELINE: &str = "defaults";

/// Complete baseline configuration.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    /// Git remote and branch settings
    pub git: GitConfig,
    /// Protected branch settings
    pub branches: BranchConfig,
    /// Default baseline settings
    pub baselines: BaselinesConfig,
    /// Performance tests registered for the project
    pub performance_tests: Vec<PerformanceTestConfig>,
}

/// Git remote and branch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Remote the upstream branches are fetched from
    pub remote: String,
    /// Main development branch on the remote
    pub master_branch: String,
    /// Release branch on the remote
    pub release_branch: String,
    /// File holding the version, read at the fork-point commit
    pub version_file: String,
    /// Whether to fetch the upstream branches before computing merge bases
    pub fetch: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            remote: "origin".to_owned(),
            master_branch: "master".to_owned(),
            release_branch: "release".to_owned(),
            version_file: "version.txt".to_owned(),
            fetch: true,
        }
    }
}

/// Protected branch settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchConfig {
    /// Branches that never get a fork-point baseline
    pub protected: Vec<String>,
    /// Project property holding the current branch name
    pub branch_property: String,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            protected: vec!["master".to_owned(), "release".to_owned()],
            branch_property: "branchName".to_owned(),
        }
    }
}

/// Default baseline settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselinesConfig {
    /// Baseline list performance tests use when nothing else is configured
    pub default_list: String,
}

impl Default for BaselinesConfig {
    fn default() -> Self {
        Self {
            default_list: "last".to_owned(),
        }
    }
}

/// A performance test declared in the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceTestConfig {
    /// Test task name
    pub name: String,
    /// Baselines to compare against, if set
    #[serde(default)]
    pub baselines: Option<String>,
}

impl BaselineConfig {
    /// Get the per-user configuration directory (`~/.baseline`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn user_config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".baseline"))
    }

    /// Get the per-user configuration file path (`~/.baseline/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn user_config_path() -> Result<PathBuf> {
        Ok(Self::user_config_dir()?.join("config.toml"))
    }

    /// Locate and load the configuration for a project.
    ///
    /// Lookup order: the explicit path, `<project>/baseline.toml`, the user
    /// config file, built-in defaults. An explicit path that does not exist
    /// is an error; the other locations are optional.
    ///
    /// # Errors
    /// Returns an error if a selected file cannot be read, parsed or validated
    pub fn discover(project_dir: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(Error::ConfigNotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let project_file = project_dir.join(PROJECT_CONFIG_FILE);
        if project_file.is_file() {
            return Self::load_from_file(&project_file);
        }

        if let Ok(user_file) = Self::user_config_path()
            && user_file.is_file()
        {
            return Self::load_from_file(&user_file);
        }

        debug!("No configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed or validated
    pub fn load_from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        let header = "# Commit baseline configuration\n\
                      # Edit this file to customize remotes, branches and baselines\n\n";

        fs::write(path, format!("{header}{contents}"))?;
        Ok(())
    }

    /// Reject configurations that cannot drive a git lookup.
    ///
    /// # Errors
    /// Returns [`Error::Config`] naming the first empty required field
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("git.remote", &self.git.remote),
            ("git.master_branch", &self.git.master_branch),
            ("git.release_branch", &self.git.release_branch),
            ("git.version_file", &self.git.version_file),
            ("branches.branch_property", &self.branches.branch_property),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{field} must not be empty")));
            }
        }

        if let Some(test) = self
            .performance_tests
            .iter()
            .find(|test| test.name.trim().is_empty())
        {
            return Err(Error::Config(format!(
                "performance test with baselines {:?} has an empty name",
                test.baselines
            )));
        }

        Ok(())
    }

    /// Whether `branch` is one of the protected branches.
    pub fn is_protected_branch(&self, branch: &str) -> bool {
        self.branches.protected.iter().any(|name| name == branch)
    }

    /// Whether a test's baselines are one of the default forms.
    ///
    /// Absent, empty, the literal `defaults` and the configured default list
    /// all count as default.
    pub fn is_default_baseline_list(&self, baselines: Option<&str>) -> bool {
        match baselines {
            None => true,
            Some(value) => {
                value.is_empty()
                    || value == DEFAULTS_BASELINE
                    || value == self.baselines.default_list
            }
        }
    }
}
