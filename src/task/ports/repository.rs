//! Repository port for task persistence, lookup, and lifecycle transitions.

use crate::task::domain::{Task, TaskDomainError, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// Each call either commits fully or leaves storage untouched. Absence is
/// reported through `false` or `None`, never through an error.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Creates a pending task and returns it as stored.
    ///
    /// The returned creation timestamp is the one recorded by storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Validation`] when the description is
    /// empty or whitespace-only; nothing is written in that case.
    async fn create_task(&self, description: &str) -> TaskRepositoryResult<Task>;

    /// Marks a pending task as completed.
    ///
    /// Returns `false` when the task does not exist or is already completed.
    /// An existing completion timestamp is never overwritten.
    async fn mark_completed(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Permanently removes a task in either state.
    ///
    /// Returns `false` when the task does not exist.
    async fn delete_task(&self, id: TaskId) -> TaskRepositoryResult<bool>;

    /// Returns every task, newest creation first.
    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns pending tasks, newest creation first.
    async fn list_pending(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Returns completed tasks, most recently completed first.
    async fn list_completed(&self) -> TaskRepositoryResult<Vec<Task>>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// Input failed domain validation before reaching storage.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` for input validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns `true` for storage failures.
    #[must_use]
    pub const fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}
