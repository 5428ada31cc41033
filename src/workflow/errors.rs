//! # Workflow Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Failures that escape a workflow operation.
///
/// Mail and AI provider failures are absorbed inside the workflow and never
/// appear here.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Loading or saving the data file failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A previous operation panicked while holding the record lock
    #[error("Record lock poisoned")]
    LockPoisoned,

    /// The blocking task running the operation did not complete
    #[error("Workflow task failed: {0}")]
    TaskFailed(String),
}
