use core::error::Error;
use core::fmt;
use core::slice;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{Result, WorkerError};

/// Shared failure recorded on a subject.
pub type SubjectFailure = Arc<dyn Error + Send + Sync>;

/// Subject which is transformed, or the result of a transformation.
///
/// A chain starts from an initial file or artifact and moves to either a
/// transformed subject with new files or a failed one. Derived subjects keep
/// the display name of the subject they came from.
#[derive(Debug, Clone)]
pub enum TransformSubject {
    /// A plain input file
    InitialFile {
        /// The input file
        file: PathBuf,
    },
    /// An input file belonging to a named artifact
    InitialArtifact {
        /// Artifact identifier shown to users
        artifact_id: String,
        /// The artifact's file
        file: PathBuf,
    },
    /// The output of a successful transformation
    Transformed {
        /// Display name inherited from the previous subject
        display_name: String,
        /// Files produced by the transformation
        files: Vec<PathBuf>,
    },
    /// A transformation that failed
    Failed {
        /// Display name of the subject that failed to transform
        display_name: String,
        /// Why it failed
        failure: SubjectFailure,
    },
}

impl TransformSubject {
    /// Start a chain from a file.
    pub fn initial_file(file: impl Into<PathBuf>) -> Self {
        Self::InitialFile { file: file.into() }
    }

    /// Start a chain from an artifact's file.
    pub fn initial_artifact(artifact_id: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self::InitialArtifact {
            artifact_id: artifact_id.into(),
            file: file.into(),
        }
    }

    /// A subject that failed before any transformation could start.
    pub fn failure<E>(display_name: impl Into<String>, failure: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Failed {
            display_name: display_name.into(),
            failure: Arc::new(failure),
        }
    }

    /// The files to transform.
    ///
    /// # Errors
    /// Returns [`WorkerError::UnsupportedOperation`] for failed subjects
    pub fn files(&self) -> Result<&[PathBuf]> {
        match self {
            Self::InitialFile { file } | Self::InitialArtifact { file, .. } => {
                Ok(slice::from_ref(file))
            }
            Self::Transformed { files, .. } => Ok(files),
            Self::Failed { display_name, .. } => Err(WorkerError::UnsupportedOperation(
                format!("{display_name} failed and has no files"),
            )),
        }
    }

    /// The recorded failure of a previous transformation, if any.
    pub fn failure_cause(&self) -> Option<&(dyn Error + Send + Sync)> {
        match self {
            Self::Failed { failure, .. } => Some(failure.as_ref()),
            _ => None,
        }
    }

    /// Whether this subject records a failure.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Name shown to users.
    pub fn display_name(&self) -> String {
        match self {
            Self::InitialFile { file } => format!("file {}", file.display()),
            Self::InitialArtifact { artifact_id, .. } => format!("artifact {artifact_id}"),
            Self::Transformed { display_name, .. } | Self::Failed { display_name, .. } => {
                display_name.clone()
            }
        }
    }

    /// Record that transforming this subject failed.
    #[must_use]
    pub fn transformation_failed<E>(&self, failure: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::failure(self.display_name(), failure)
    }

    /// Record the files produced by transforming this subject.
    #[must_use]
    pub fn transformation_successful(&self, files: Vec<PathBuf>) -> Self {
        Self::Transformed {
            display_name: self.display_name(),
            files,
        }
    }

    /// The single input file of an initial subject.
    pub fn initial_path(&self) -> Option<&Path> {
        match self {
            Self::InitialFile { file } | Self::InitialArtifact { file, .. } => Some(file),
            Self::Transformed { .. } | Self::Failed { .. } => None,
        }
    }
}

impl fmt::Display for TransformSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_initial_subjects() {
        let file = TransformSubject::initial_file("sources/a.txt");
        assert_eq!(file.to_string(), "file sources/a.txt");
        assert_eq!(file.files().map(<[PathBuf]>::len).ok(), Some(1));
        assert!(file.failure_cause().is_none());

        let artifact = TransformSubject::initial_artifact("lib.jar (org:lib:1.0)", "cache/lib.jar");
        assert_eq!(artifact.display_name(), "artifact lib.jar (org:lib:1.0)");
        assert_eq!(artifact.initial_path(), Some(Path::new("cache/lib.jar")));
    }

    #[test]
    fn test_success_keeps_previous_name() {
        let subject = TransformSubject::initial_file("sources/a.txt");
        let outputs = vec![PathBuf::from("out/a.txt"), PathBuf::from("out/a.txt.map")];
        let transformed = subject.transformation_successful(outputs.clone());

        assert_eq!(transformed.display_name(), "file sources/a.txt");
        match transformed.files() {
            Ok(files) => assert_eq!(files, outputs.as_slice()),
            Err(error) => panic!("files failed: {error}"),
        }
        assert!(transformed.initial_path().is_none());
    }

    #[test]
    fn test_failed_subject_has_no_files() {
        let subject = TransformSubject::initial_file("sources/a.txt");
        let failed = subject.transformation_failed(io::Error::other("disk full"));

        assert!(failed.is_failed());
        assert_eq!(failed.display_name(), "file sources/a.txt");
        assert_eq!(
            failed.failure_cause().map(ToString::to_string),
            Some("disk full".to_owned())
        );
        assert!(matches!(
            failed.files(),
            Err(WorkerError::UnsupportedOperation(_))
        ));
    }
}
