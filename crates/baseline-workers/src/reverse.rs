use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::{IsolationMode, Result, TransformSubject, WorkAction, WorkerExecutor};

/// Reverses the text of one file into a destination file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseFile {
    /// File whose contents are reversed
    pub file_to_reverse: PathBuf,
    /// Where the reversed contents are written
    pub destination_file: PathBuf,
}

impl WorkAction for ReverseFile {
    fn display_name(&self) -> String {
        format!("reverse {}", self.file_to_reverse.display())
    }

    fn execute(self) -> Result<()> {
        // Undecodable bytes become U+FFFD rather than failing the file
        let bytes = fs::read(&self.file_to_reverse)?;
        let reversed: String = String::from_utf8_lossy(&bytes).chars().rev().collect();

        if let Some(parent) = self.destination_file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.destination_file, reversed)?;
        debug!(
            "Reversed {} into {}",
            self.file_to_reverse.display(),
            self.destination_file.display()
        );
        Ok(())
    }
}

/// Reverses every file under a set of source paths into one output directory.
///
/// Each file becomes its own unit of work. Outputs are flattened: two sources
/// with the same file name write the same destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseFiles {
    sources: Vec<PathBuf>,
    output_dir: PathBuf,
}

impl ReverseFiles {
    /// Create the task.
    pub fn new(sources: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources,
            output_dir: output_dir.into(),
        }
    }

    /// Source files or directories.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Directory receiving the reversed files.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Every regular file under the sources, in walk order per source.
    ///
    /// Sources that do not exist are skipped.
    ///
    /// # Errors
    /// Returns an error if a directory cannot be read
    pub fn source_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for source in &self.sources {
            if !source.exists() {
                debug!("Skipping missing source {}", source.display());
                continue;
            }
            for entry in WalkDir::new(source).sort_by_file_name() {
                let entry = entry?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        }
        Ok(files)
    }

    /// Destination of a source file inside the output directory.
    pub fn destination_for(&self, file: &Path) -> PathBuf {
        file.file_name()
            .map_or_else(|| self.output_dir.clone(), |name| self.output_dir.join(name))
    }

    /// Submit one [`ReverseFile`] per source file and wait for all of them.
    ///
    /// Returns one subject per source file, in walk order: transformed with
    /// its destination, or failed with the unit's error. Reports of work
    /// submitted to `executor` by other callers are collected and dropped.
    ///
    /// # Errors
    /// Returns an error if the sources cannot be listed or the executor fails
    pub async fn reverse_files(
        &self,
        executor: &mut WorkerExecutor,
    ) -> Result<Vec<TransformSubject>> {
        let files = self.source_files()?;
        info!(
            "Reversing {} file(s) into {}",
            files.len(),
            self.output_dir.display()
        );

        let mut pending = BTreeMap::new();
        for file in files {
            let destination_file = self.destination_for(&file);
            let subject = TransformSubject::initial_file(&file);
            let index = executor.submit(
                ReverseFile {
                    file_to_reverse: file,
                    destination_file: destination_file.clone(),
                },
                |spec| spec.isolation_mode = IsolationMode::None,
            );
            pending.insert(index, (subject, destination_file));
        }

        let mut outcomes = Vec::with_capacity(pending.len());
        for report in executor.await_reports().await? {
            let Some((subject, destination)) = pending.remove(&report.index) else {
                debug!("Dropping report of unrelated work {}", report.display_name);
                continue;
            };
            outcomes.push(report.result.map_or_else(
                |error| subject.transformation_failed(error),
                |()| subject.transformation_successful(vec![destination]),
            ));
        }
        Ok(outcomes)
    }
}
