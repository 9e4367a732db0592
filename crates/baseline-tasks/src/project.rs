use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use baseline_core::{BaselineConfig, PerformanceTestConfig};
use serde::Serialize;

/// A performance test task and the baselines it compares against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PerformanceTest {
    /// Task name
    pub name: String,
    /// Comma separated baselines, absent when never configured
    pub baselines: Option<String>,
}

impl PerformanceTest {
    /// A test with no baselines configured.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            baselines: None,
        }
    }

    /// Set the baselines.
    #[must_use]
    pub fn with_baselines(mut self, baselines: impl Into<String>) -> Self {
        self.baselines = Some(baselines.into());
        self
    }
}

impl From<&PerformanceTestConfig> for PerformanceTest {
    fn from(config: &PerformanceTestConfig) -> Self {
        Self {
            name: config.name.clone(),
            baselines: config.baselines.clone(),
        }
    }
}

/// The build a task runs in: a root directory, string properties and the
/// registered performance tests.
#[derive(Debug, Clone, Default)]
pub struct Project {
    root_dir: PathBuf,
    properties: BTreeMap<String, String>,
    performance_tests: Vec<PerformanceTest>,
}

impl Project {
    /// Create an empty project rooted at `root_dir`.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            properties: BTreeMap::new(),
            performance_tests: Vec::new(),
        }
    }

    /// Create a project with the performance tests declared in `config`.
    pub fn from_config(root_dir: impl Into<PathBuf>, config: &BaselineConfig) -> Self {
        let mut project = Self::new(root_dir);
        for test in &config.performance_tests {
            project.register_performance_test(test.into());
        }
        project
    }

    /// Project root directory.
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Set a string property.
    pub fn set_property(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(name.into(), value.into());
    }

    /// Set a string property, builder style.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_property(name, value);
        self
    }

    /// A string property, or `None` when unset or blank.
    pub fn string_property_or_none(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// Register a performance test. Registration order is preserved.
    pub fn register_performance_test(&mut self, test: PerformanceTest) {
        self.performance_tests.push(test);
    }

    /// Register a performance test, builder style.
    #[must_use]
    pub fn with_performance_test(mut self, test: PerformanceTest) -> Self {
        self.register_performance_test(test);
        self
    }

    /// All registered performance tests, in registration order.
    pub fn performance_tests(&self) -> &[PerformanceTest] {
        &self.performance_tests
    }

    /// Mutable access to the registered performance tests.
    pub fn performance_tests_mut(&mut self) -> &mut [PerformanceTest] {
        &mut self.performance_tests
    }
}
