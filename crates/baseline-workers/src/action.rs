use crate::Result;

/// A self-contained unit of work.
///
/// Everything the action needs is owned by the value itself, so it can be
/// moved onto whichever thread its isolation mode selects.
pub trait WorkAction: Send + 'static {
    /// Human readable name used in logs and failure reports.
    fn display_name(&self) -> String;

    /// Perform the work.
    ///
    /// # Errors
    /// Returns an error if the work could not be completed
    fn execute(self) -> Result<()>;
}
