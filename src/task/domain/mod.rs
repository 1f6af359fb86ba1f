//! Domain model for task tracking.
//!
//! A task is a single action item that starts out pending, may be completed
//! exactly once, and disappears when deleted. The types here validate
//! themselves on construction and carry no storage concerns.

mod error;
mod ids;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskDescription, TaskId};
pub use task::{PersistedTaskData, Task, TaskStatus};
