use baseline_core::{BaselineConfig, CommitBaseline};

use crate::Project;

/// Whether the project's branch property names a protected branch.
///
/// A missing branch property is never protected.
pub fn current_branch_is_protected(project: &Project, config: &BaselineConfig) -> bool {
    project
        .string_property_or_none(&config.branches.branch_property)
        .is_some_and(|branch| config.is_protected_branch(branch))
}

/// Whether no performance test has a baseline list outside the default forms.
///
/// True for a project without performance tests.
pub fn all_performance_tests_have_default_baselines(
    project: &Project,
    config: &BaselineConfig,
) -> bool {
    project
        .performance_tests()
        .iter()
        .all(|test| config.is_default_baseline_list(test.baselines.as_deref()))
}

/// The first performance test baseline that is a commit baseline.
pub fn any_explicitly_set_commit_baseline(project: &Project) -> Option<CommitBaseline> {
    project
        .performance_tests()
        .iter()
        .filter_map(|test| test.baselines.as_deref())
        .find_map(|baselines| CommitBaseline::parse(baselines).ok())
}

/// Whether a fork-point baseline has to be computed from git history.
pub fn fork_point_commit_required(project: &Project, config: &BaselineConfig) -> bool {
    !current_branch_is_protected(project, config)
        && all_performance_tests_have_default_baselines(project, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PerformanceTest;

    fn project_on(branch: &str) -> Project {
        Project::new(".").with_property("branchName", branch)
    }

    #[test]
    fn test_protected_branches() {
        let config = BaselineConfig::default();
        assert!(current_branch_is_protected(&project_on("master"), &config));
        assert!(current_branch_is_protected(&project_on("release"), &config));
        assert!(!current_branch_is_protected(&project_on("gh/perf-fix"), &config));
        assert!(!current_branch_is_protected(&Project::new("."), &config));
    }

    #[test]
    fn test_custom_branch_property() {
        let mut config = BaselineConfig::default();
        config.branches.branch_property = "ciBranch".to_owned();
        config.branches.protected = vec!["main".to_owned()];

        let project = Project::new(".")
            .with_property("ciBranch", "main")
            .with_property("branchName", "master");
        assert!(current_branch_is_protected(&project, &config));
    }

    #[test]
    fn test_default_baselines() {
        let config = BaselineConfig::default();
        let project = project_on("feature")
            .with_performance_test(PerformanceTest::new("performanceTest"))
            .with_performance_test(PerformanceTest::new("slowTest").with_baselines("defaults"))
            .with_performance_test(PerformanceTest::new("adhocTest").with_baselines("last"))
            .with_performance_test(PerformanceTest::new("emptyTest").with_baselines(""));
        assert!(all_performance_tests_have_default_baselines(&project, &config));
        assert!(fork_point_commit_required(&project, &config));

        let pinned = project.with_performance_test(
            PerformanceTest::new("pinnedTest").with_baselines("5.0"),
        );
        assert!(!all_performance_tests_have_default_baselines(&pinned, &config));
        assert!(!fork_point_commit_required(&pinned, &config));
    }

    #[test]
    fn test_no_fork_point_on_protected_branch() {
        let config = BaselineConfig::default();
        let project = project_on("master")
            .with_performance_test(PerformanceTest::new("performanceTest"));
        assert!(!fork_point_commit_required(&project, &config));
    }

    #[test]
    fn test_first_commit_baseline_wins() {
        let project = project_on("feature")
            .with_performance_test(PerformanceTest::new("a").with_baselines("last"))
            .with_performance_test(PerformanceTest::new("b").with_baselines("5.1-commit-bbb"))
            .with_performance_test(PerformanceTest::new("c").with_baselines("5.2-commit-ccc"));

        let baseline = any_explicitly_set_commit_baseline(&project);
        assert_eq!(
            baseline.map(|baseline| baseline.to_string()),
            Some("5.1-commit-bbb".to_owned())
        );
    }

    #[test]
    fn test_comma_lists_are_not_commit_baselines() {
        let project = project_on("feature").with_performance_test(
            PerformanceTest::new("a").with_baselines("last,5.1-commit-bbb"),
        );
        assert!(any_explicitly_set_commit_baseline(&project).is_none());
    }
}
