//! Form input and view selection for task front ends.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Longest description a form submission may carry, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Which subset of tasks a front end is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewMode {
    /// Pending tasks only.
    #[default]
    Active,
    /// Completed tasks only.
    Completed,
    /// Every task.
    All,
}

impl ViewMode {
    /// Returns the canonical name of the view.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::All => "all",
        }
    }
}

impl FromStr for ViewMode {
    type Err = ParseViewModeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "all" => Ok(Self::All),
            _ => Err(ParseViewModeError(value.to_owned())),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognised view name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown view '{0}', expected active, completed, or all")]
pub struct ParseViewModeError(pub String);

/// Reasons a task form submission is rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskFormError {
    /// The description is missing or blank.
    #[error("task description cannot be empty")]
    EmptyDescription,

    /// The description exceeds the character limit.
    #[error("task description must be {max} characters or less, got {actual}")]
    DescriptionTooLong {
        /// Maximum accepted length.
        max: usize,
        /// Length of the submitted description after trimming.
        actual: usize,
    },
}

/// New-task form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaskForm {
    description: Option<String>,
}

impl TaskForm {
    /// Creates a form from a possibly missing description field.
    #[must_use]
    pub const fn new(description: Option<String>) -> Self {
        Self { description }
    }

    /// Creates a form with the given description.
    #[must_use]
    pub fn with_description(description: impl Into<String>) -> Self {
        Self::new(Some(description.into()))
    }

    /// Validates the submission and returns the trimmed description.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFormError::EmptyDescription`] for a missing or blank
    /// description and [`TaskFormError::DescriptionTooLong`] when it exceeds
    /// [`MAX_DESCRIPTION_CHARS`].
    pub fn validate(&self) -> Result<&str, TaskFormError> {
        let trimmed = self.description.as_deref().map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Err(TaskFormError::EmptyDescription);
        }

        let actual = trimmed.chars().count();
        if actual > MAX_DESCRIPTION_CHARS {
            return Err(TaskFormError::DescriptionTooLong {
                max: MAX_DESCRIPTION_CHARS,
                actual,
            });
        }
        Ok(trimmed)
    }
}
