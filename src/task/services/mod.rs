//! Application services for task tracking front ends.

mod board;
mod form;

pub use board::{TaskBoardError, TaskBoardResult, TaskBoardService};
pub use form::{MAX_DESCRIPTION_CHARS, ParseViewModeError, TaskForm, TaskFormError, ViewMode};
