//! Error types for the task store and the task form.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading, writing or indexing the task store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("cannot read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("task index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Rejected form input. The `Display` text is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Task description cannot be empty.")]
    EmptyDescription,
    #[error("Due date must be in YYYY-MM-DD format.")]
    InvalidDueDate(String),
}
