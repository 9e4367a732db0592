use std::env;
use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::thread::available_parallelism;

use anyhow::{Context as _, Result, bail};
use baseline_core::BaselineConfig;
use baseline_git::SystemGit;
use baseline_tasks::{DetermineCommitBaseline, PerformanceTest, Project, TaskOutcome};
use baseline_workers::{ReverseFiles, WorkerExecutor};
use tracing::debug;
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
};

/// Environment variable supplying the branch when `--branch` is absent
const BRANCH_ENV: &str = "BRANCH_NAME";

/// Test registered when `--baselines` is given but no test is configured
const DEFAULT_TEST_NAME: &str = "performanceTest";

/// Install the stderr log subscriber.
///
/// # Errors
/// Returns an error if a global subscriber is already set
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    Registry::default()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!(
                "baseline={level},baseline_core={level},baseline_git={level},baseline_tasks={level},baseline_workers={level}"
            )
            .into()
        }))
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_level(true),
        )
        .try_init()
        .context("Failed to initialize logging")
}

/// Options of the `determine` subcommand
pub struct DetermineArgs {
    /// Project root directory, also the git working directory
    pub project: PathBuf,
    /// Branch name from the command line
    pub branch: Option<String>,
    /// Baselines to set on every performance test
    pub baselines: Option<String>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Skip fetching the upstream branches
    pub no_fetch: bool,
    /// Print JSON instead of plain text
    pub json: bool,
}

/// Run the commit baseline task for a project and print its outcome.
///
/// # Errors
/// Returns an error if the configuration cannot be loaded or git fails
pub fn handle_determine(args: &DetermineArgs) -> Result<()> {
    let mut config = BaselineConfig::discover(&args.project, args.config.as_deref())
        .context("Failed to load configuration")?;
    if args.no_fetch {
        config.git.fetch = false;
    }

    let mut project = Project::from_config(&args.project, &config);
    if let Some(branch) = args.branch.clone().or_else(|| env::var(BRANCH_ENV).ok()) {
        debug!("Current branch: {branch}");
        project.set_property(config.branches.branch_property.clone(), branch);
    }

    if let Some(baselines) = &args.baselines {
        if project.performance_tests().is_empty() {
            project.register_performance_test(PerformanceTest::new(DEFAULT_TEST_NAME));
        }
        for test in project.performance_tests_mut() {
            test.baselines = Some(baselines.clone());
        }
    }

    let git = SystemGit::new(&args.project);
    let mut task = DetermineCommitBaseline::new(config);
    let outcome = task
        .run(&mut project, &git)
        .context("Failed to determine commit baseline")?;

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?;
        println!("{rendered}");
        return Ok(());
    }

    match outcome {
        TaskOutcome::Skipped => println!("No commit baseline required"),
        TaskOutcome::ForkPoint(baseline) | TaskOutcome::Explicit(baseline) => {
            println!("{baseline}");
        }
    }
    Ok(())
}

/// Reverse every source file into `output` and list what was written.
///
/// # Errors
/// Returns an error if the sources cannot be listed or any file failed
pub async fn handle_reverse_files(
    sources: Vec<PathBuf>,
    output: PathBuf,
    workers: Option<usize>,
) -> Result<()> {
    let max_workers =
        workers.unwrap_or_else(|| available_parallelism().map_or(1, NonZeroUsize::get));
    let task = ReverseFiles::new(sources, output);
    let mut executor = WorkerExecutor::new(max_workers);

    let subjects = task
        .reverse_files(&mut executor)
        .await
        .context("Failed to reverse files")?;

    for subject in &subjects {
        match subject.failure_cause() {
            Some(cause) => println!("failed {subject}: {cause}"),
            None => {
                for file in subject.files()? {
                    println!("{subject} -> {}", file.display());
                }
            }
        }
    }

    let failed = subjects.iter().filter(|subject| subject.is_failed()).count();
    if failed > 0 {
        bail!("{failed} of {} file(s) could not be reversed", subjects.len());
    }
    Ok(())
}
