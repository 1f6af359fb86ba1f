//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// A pending task carried a completion timestamp.
    #[error("pending tasks cannot have a completion timestamp")]
    PendingTaskHasCompletionTime,

    /// A completed task had no completion timestamp.
    #[error("completed tasks must have a completion timestamp")]
    CompletedTaskMissingCompletionTime,
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
