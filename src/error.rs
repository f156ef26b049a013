//! Error types for task store operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::task::TaskId;

/// Errors that can occur while creating, completing or persisting tasks.
#[derive(Error, Debug)]
pub enum TaskError {
    /// Due date text did not match `YYYY-MM-DD`.
    #[error("Invalid date format. Please use YYYY-MM-DD.")]
    InvalidDueDate { input: String },

    /// No task with this id exists in the collection.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// Positional lookup past the end of the collection.
    #[error("Task position {position} is out of range (collection has {len} tasks)")]
    PositionOutOfRange { position: usize, len: usize },

    /// Reading or writing the task file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The task file exists but does not hold a valid task list.
    #[error("Corrupt task data in {}: {source}", .path.display())]
    CorruptData {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to encode the task list.
    #[error("Failed to serialize tasks: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TaskError>;
