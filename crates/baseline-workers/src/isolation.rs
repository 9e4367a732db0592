use core::fmt;
use core::str::FromStr;

use crate::WorkerError;

/// How strongly a unit of work is separated from the submitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IsolationMode {
    /// Let the executor choose; currently the same as [`IsolationMode::Thread`]
    #[default]
    Auto,
    /// Run as a task on the shared async runtime
    ///
    /// On a multi-thread runtime the work is wrapped in
    /// `tokio::task::block_in_place`; on a current-thread runtime it blocks
    /// the runtime until it returns.
    None,
    /// Run on a dedicated blocking thread
    Thread,
}

impl IsolationMode {
    /// The concrete mode `Auto` stands for.
    #[must_use]
    pub fn resolve(self) -> Self {
        match self {
            Self::Auto | Self::Thread => Self::Thread,
            Self::None => Self::None,
        }
    }
}

impl fmt::Display for IsolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Auto => "auto",
            Self::None => "none",
            Self::Thread => "thread",
        };
        f.write_str(name)
    }
}

impl FromStr for IsolationMode {
    type Err = WorkerError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "none" => Ok(Self::None),
            "thread" => Ok(Self::Thread),
            other => Err(WorkerError::UnsupportedOperation(format!(
                "unknown isolation mode '{other}' (expected auto, none or thread)"
            ))),
        }
    }
}

/// Settings for a single submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkerSpec {
    /// Isolation level for the unit of work
    pub isolation_mode: IsolationMode,
}
