use core::any::Any;
use std::sync::Arc;

use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet, block_in_place, spawn, spawn_blocking};
use tracing::{debug, warn};

use crate::{IsolationMode, Result, WorkAction, WorkFailure, WorkerError, WorkerSpec};

/// Outcome of one submitted unit of work.
#[derive(Debug)]
pub struct WorkReport {
    /// Submission order, starting at 0
    pub index: usize,
    /// Display name of the unit of work
    pub display_name: String,
    /// Isolation mode the work actually ran with
    pub isolation_mode: IsolationMode,
    /// Whether the work completed
    pub result: Result<()>,
}

impl WorkReport {
    /// Whether the unit of work completed without error.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Runs submitted units of work concurrently, at most `max_workers` at once.
///
/// Submissions start immediately in the background; [`Self::await_reports`]
/// or [`Self::await_completion`] wait for everything submitted so far. Must
/// be used from within a tokio runtime.
pub struct WorkerExecutor {
    semaphore: Arc<Semaphore>,
    max_workers: usize,
    submitted: usize,
    join_set: JoinSet<WorkReport>,
}

impl WorkerExecutor {
    /// Create an executor; `max_workers` of 0 is treated as 1.
    pub fn new(max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(max_workers)),
            max_workers,
            submitted: 0,
            join_set: JoinSet::new(),
        }
    }

    /// Maximum number of units running at the same time.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Number of submitted units not yet collected.
    pub fn pending(&self) -> usize {
        self.join_set.len()
    }

    /// Submit a unit of work and return its submission index.
    ///
    /// `configure` adjusts the [`WorkerSpec`] for this submission, e.g. to
    /// choose an isolation mode. The index matches [`WorkReport::index`].
    pub fn submit<A, F>(&mut self, action: A, configure: F) -> usize
    where
        A: WorkAction,
        F: FnOnce(&mut WorkerSpec),
    {
        let mut spec = WorkerSpec::default();
        configure(&mut spec);

        let index = self.submitted;
        self.submitted += 1;
        let isolation_mode = spec.isolation_mode.resolve();
        let display_name = action.display_name();
        let semaphore = Arc::clone(&self.semaphore);
        debug!("Submitting {display_name} with {isolation_mode} isolation");

        self.join_set.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(permit) => {
                    let result = run_isolated(isolation_mode, action).await;
                    drop(permit);
                    result
                }
                Err(_) => Err(WorkerError::Closed),
            };

            if let Err(error) = &result {
                warn!("{display_name} failed: {error}");
            }

            WorkReport {
                index,
                display_name,
                isolation_mode,
                result,
            }
        });
        index
    }

    /// Wait for every submitted unit and return all reports in submission
    /// order, successful or not.
    ///
    /// # Errors
    /// Returns an error if the executor's own bookkeeping task was lost
    pub async fn await_reports(&mut self) -> Result<Vec<WorkReport>> {
        let mut reports = Vec::with_capacity(self.join_set.len());
        while let Some(joined) = self.join_set.join_next().await {
            reports.push(joined.map_err(join_error)?);
        }
        reports.sort_by_key(|report| report.index);
        Ok(reports)
    }

    /// Wait for every submitted unit and fail if any of them failed.
    ///
    /// # Errors
    /// Returns [`WorkerError::Failed`] listing every failed unit
    pub async fn await_completion(&mut self) -> Result<Vec<WorkReport>> {
        let reports = self.await_reports().await?;
        let failures: Vec<WorkFailure> = reports
            .iter()
            .filter_map(|report| {
                report.result.as_ref().err().map(|error| WorkFailure {
                    display_name: report.display_name.clone(),
                    message: error.to_string(),
                })
            })
            .collect();

        if failures.is_empty() {
            Ok(reports)
        } else {
            Err(WorkerError::Failed(failures))
        }
    }
}

async fn run_isolated<A>(isolation_mode: IsolationMode, action: A) -> Result<()>
where
    A: WorkAction,
{
    let joined = match isolation_mode {
        // Blocking work on a shared worker thread must not starve other tasks
        IsolationMode::None => {
            spawn(async move {
                if Handle::current().runtime_flavor() == RuntimeFlavor::MultiThread {
                    block_in_place(|| action.execute())
                } else {
                    action.execute()
                }
            })
            .await
        }
        IsolationMode::Auto | IsolationMode::Thread => {
            spawn_blocking(move || action.execute()).await
        }
    };
    joined.map_err(join_error)?
}

fn join_error(error: JoinError) -> WorkerError {
    if error.is_panic() {
        WorkerError::Panicked(panic_message(&*error.into_panic()))
    } else {
        WorkerError::Cancelled
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    struct Recorded {
        name: String,
        running: Arc<AtomicUsize>,
        peak: Arc<AtomicUsize>,
    }

    impl WorkAction for Recorded {
        fn display_name(&self) -> String {
            self.name.clone()
        }

        fn execute(self) -> Result<()> {
            let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20));
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    impl WorkAction for Failing {
        fn display_name(&self) -> String {
            "failing".to_owned()
        }

        fn execute(self) -> Result<()> {
            Err(WorkerError::UnsupportedOperation("nothing to do".to_owned()))
        }
    }

    struct Panicking;

    impl WorkAction for Panicking {
        fn display_name(&self) -> String {
            "panicking".to_owned()
        }

        fn execute(self) -> Result<()> {
            panic!("worker exploded");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_is_bounded() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut executor = WorkerExecutor::new(2);

        for index in 0..6 {
            executor.submit(
                Recorded {
                    name: format!("unit {index}"),
                    running: Arc::clone(&running),
                    peak: Arc::clone(&peak),
                },
                |spec| spec.isolation_mode = IsolationMode::Thread,
            );
        }
        assert_eq!(executor.pending(), 6);

        let reports = match executor.await_completion().await {
            Ok(reports) => reports,
            Err(error) => panic!("work failed: {error}"),
        };
        assert_eq!(reports.len(), 6);
        assert!(peak.load(Ordering::SeqCst) <= 2);
        let indices: Vec<_> = reports.iter().map(|report| report.index).collect();
        assert_eq!(indices, [0, 1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_failures_are_aggregated() {
        let mut executor = WorkerExecutor::new(4);
        executor.submit(Failing, |_| {});
        executor.submit(Panicking, |spec| spec.isolation_mode = IsolationMode::None);

        match executor.await_completion().await {
            Err(WorkerError::Failed(failures)) => {
                assert_eq!(failures.len(), 2);
                assert_eq!(failures[0].display_name, "failing");
                assert_eq!(failures[1].display_name, "panicking");
                assert_eq!(failures[1].message, "Work panicked: worker exploded");
            }
            other => panic!("expected aggregated failure, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_no_isolation_on_multi_thread_runtime() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut executor = WorkerExecutor::new(3);
        for index in 0..3 {
            executor.submit(
                Recorded {
                    name: format!("inline {index}"),
                    running: Arc::clone(&running),
                    peak: Arc::clone(&peak),
                },
                |spec| spec.isolation_mode = IsolationMode::None,
            );
        }

        let reports = match executor.await_completion().await {
            Ok(reports) => reports,
            Err(error) => panic!("work failed: {error}"),
        };
        assert_eq!(reports.len(), 3);
        assert!(
            reports
                .iter()
                .all(|report| report.isolation_mode == IsolationMode::None)
        );
    }

    #[tokio::test]
    async fn test_no_isolation_on_current_thread_runtime() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let mut executor = WorkerExecutor::new(2);
        executor.submit(
            Recorded {
                name: "inline".to_owned(),
                running: Arc::clone(&running),
                peak: Arc::clone(&peak),
            },
            |spec| spec.isolation_mode = IsolationMode::None,
        );

        match executor.await_completion().await {
            Ok(reports) => assert!(reports[0].is_success()),
            Err(error) => panic!("work failed: {error}"),
        }
        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_returns_report_index() {
        let mut executor = WorkerExecutor::new(1);
        let first = executor.submit(Failing, |_| {});
        let second = executor.submit(Failing, |_| {});
        assert_eq!((first, second), (0, 1));

        let reports = match executor.await_reports().await {
            Ok(reports) => reports,
            Err(error) => panic!("await failed: {error}"),
        };
        let third = executor.submit(Failing, |_| {});
        assert_eq!(third, 2);
        assert_eq!(reports[1].index, second);
    }

    #[tokio::test]
    async fn test_reports_record_resolved_isolation() {
        let mut executor = WorkerExecutor::new(0);
        assert_eq!(executor.max_workers(), 1);
        executor.submit(Failing, |_| {});

        let reports = match executor.await_reports().await {
            Ok(reports) => reports,
            Err(error) => panic!("await failed: {error}"),
        };
        assert_eq!(reports[0].isolation_mode, IsolationMode::Thread);
        assert!(!reports[0].is_success());
    }
}
