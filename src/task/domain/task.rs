//! Task entity and lifecycle status.

use super::{ParseTaskStatusError, TaskDescription, TaskDomainError, TaskId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created and is still open.
    Pending,
    /// Task has been completed. This state is final.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task entity.
///
/// Values are immutable once built. Completing a task produces a new value
/// read back from the repository rather than mutating an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    description: TaskDescription,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a task from stored fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Storage-assigned identifier.
    pub id: TaskId,
    /// Raw description text; trimmed during construction.
    pub description: String,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Completion timestamp, present only for completed tasks.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Builds a validated task from stored fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyDescription`] for a blank description,
    /// [`TaskDomainError::PendingTaskHasCompletionTime`] when a pending task
    /// carries a completion time, and
    /// [`TaskDomainError::CompletedTaskMissingCompletionTime`] when a completed
    /// task lacks one.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        let PersistedTaskData {
            id,
            description,
            status,
            created_at,
            completed_at,
        } = data;

        let validated_description = TaskDescription::new(description)?;
        match (status, completed_at) {
            (TaskStatus::Pending, Some(_)) => {
                return Err(TaskDomainError::PendingTaskHasCompletionTime);
            }
            (TaskStatus::Completed, None) => {
                return Err(TaskDomainError::CompletedTaskMissingCompletionTime);
            }
            _ => {}
        }

        Ok(Self {
            id,
            description: validated_description,
            status,
            created_at,
            completed_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, if the task is completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns `true` when the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self.status, TaskStatus::Completed)
    }
}
