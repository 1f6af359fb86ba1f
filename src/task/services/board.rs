//! Controller translating front-end intents into repository calls.

use super::form::{TaskForm, TaskFormError, ViewMode};
use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced to front ends by [`TaskBoardService`].
#[derive(Debug, Error)]
pub enum TaskBoardError {
    /// The form submission was rejected before reaching the repository.
    #[error(transparent)]
    Form(#[from] TaskFormError),
    /// The repository rejected or failed the operation.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task board operations.
pub type TaskBoardResult<T> = Result<T, TaskBoardError>;

/// Task board controller.
///
/// Holds the repository it was given for its whole lifetime. Failures are
/// returned to the caller and logged; nothing is retried.
pub struct TaskBoardService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> Clone for TaskBoardService<R>
where
    R: TaskRepository,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R> TaskBoardService<R>
where
    R: TaskRepository,
{
    /// Creates a controller over the given repository.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Returns the tasks shown by a view.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when the query fails.
    pub async fn tasks_for_view(&self, view: ViewMode) -> TaskBoardResult<Vec<Task>> {
        let result = match view {
            ViewMode::Active => self.repository.list_pending().await,
            ViewMode::Completed => self.repository.list_completed().await,
            ViewMode::All => self.repository.list_all().await,
        };
        result.map_err(|err| report("list tasks", err))
    }

    /// Validates a form submission and creates the task it describes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Form`] for an invalid submission, in which
    /// case the repository is not called, and [`TaskBoardError::Repository`]
    /// when creation fails.
    pub async fn create_from_form(&self, form: &TaskForm) -> TaskBoardResult<Task> {
        let description = form.validate()?;
        self.repository
            .create_task(description)
            .await
            .map_err(|err| report("create task", err))
    }

    /// Marks a task as completed.
    ///
    /// Returns `false` when the task is missing or already completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when storage fails.
    pub async fn complete_task(&self, id: TaskId) -> TaskBoardResult<bool> {
        self.repository
            .mark_completed(id)
            .await
            .map_err(|err| report("complete task", err))
    }

    /// Deletes a task permanently.
    ///
    /// Returns `false` when the task is missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when storage fails.
    pub async fn delete_task(&self, id: TaskId) -> TaskBoardResult<bool> {
        self.repository
            .delete_task(id)
            .await
            .map_err(|err| report("delete task", err))
    }

    /// Looks up a single task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskBoardError::Repository`] when storage fails.
    pub async fn task(&self, id: TaskId) -> TaskBoardResult<Option<Task>> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|err| report("find task", err))
    }
}

fn report(operation: &'static str, err: TaskRepositoryError) -> TaskBoardError {
    if err.is_persistence() {
        tracing::warn!(error = %err, operation, "task storage operation failed");
    }
    TaskBoardError::Repository(err)
}
