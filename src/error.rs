//! Error types for task tracking.

use thiserror::Error;

use crate::task::TaskId;

/// Result type alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Rejected creation input, e.g. a blank title.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// A seed listed the same id twice.
    #[error("Duplicate task id: {0}")]
    DuplicateId(TaskId),

    /// Every id up to `u64::MAX` is taken.
    #[error("No task ids left after {0}")]
    IdsExhausted(TaskId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
