//! In-memory repository for task tracking tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{PersistedTaskData, Task, TaskDescription, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Follows the same contract and ordering rules as the `SQLite` adapter.
/// Timestamps come from the injected clock instead of storage.
pub struct InMemoryTaskRepository<C = DefaultClock> {
    state: Arc<RwLock<InMemoryTaskState>>,
    clock: Arc<C>,
}

#[derive(Debug)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    next_id: i64,
}

impl Default for InMemoryTaskState {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository backed by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(DefaultClock)
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> InMemoryTaskRepository<C> {
    /// Creates an empty in-memory repository using the given clock.
    #[must_use]
    pub fn with_clock(clock: C) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
            clock: Arc::new(clock),
        }
    }

    fn read(&self) -> TaskRepositoryResult<RwLockReadGuard<'_, InMemoryTaskState>> {
        self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> TaskRepositoryResult<RwLockWriteGuard<'_, InMemoryTaskState>> {
        self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl<C> Clone for InMemoryTaskRepository<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C> fmt::Debug for InMemoryTaskRepository<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTaskRepository")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Newest first by the given timestamp, then by descending identifier.
fn newest_first(
    left: &Task,
    right: &Task,
    key: impl Fn(&Task) -> Option<DateTime<Utc>>,
) -> Ordering {
    key(right)
        .cmp(&key(left))
        .then_with(|| right.id().cmp(&left.id()))
}

fn collect_sorted(
    state: &InMemoryTaskState,
    status: Option<TaskStatus>,
    key: impl Fn(&Task) -> Option<DateTime<Utc>> + Copy,
) -> Vec<Task> {
    let mut tasks: Vec<Task> = state
        .tasks
        .values()
        .filter(|task| status.is_none_or(|wanted| task.status() == wanted))
        .cloned()
        .collect();
    tasks.sort_by(|left, right| newest_first(left, right, key));
    tasks
}

fn created_key(task: &Task) -> Option<DateTime<Utc>> {
    Some(task.created_at())
}

fn completed_key(task: &Task) -> Option<DateTime<Utc>> {
    task.completed_at()
}

#[async_trait]
impl<C: Clock + Send + Sync> TaskRepository for InMemoryTaskRepository<C> {
    async fn create_task(&self, description: &str) -> TaskRepositoryResult<Task> {
        let validated = TaskDescription::new(description)?;
        let mut state = self.write()?;

        let id = TaskId::new(state.next_id);
        let task = Task::from_persisted(PersistedTaskData {
            id,
            description: validated.as_str().to_owned(),
            status: TaskStatus::Pending,
            created_at: self.clock.utc(),
            completed_at: None,
        })?;

        state.next_id += 1;
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn mark_completed(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.write()?;
        let Some(current) = state.tasks.get(&id) else {
            return Ok(false);
        };
        if current.is_completed() {
            return Ok(false);
        }

        let completed = Task::from_persisted(PersistedTaskData {
            id,
            description: current.description().as_str().to_owned(),
            status: TaskStatus::Completed,
            created_at: current.created_at(),
            completed_at: Some(self.clock.utc()),
        })?;
        state.tasks.insert(id, completed);
        Ok(true)
    }

    async fn delete_task(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let mut state = self.write()?;
        Ok(state.tasks.remove(&id).is_some())
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(collect_sorted(&state, None, created_key))
    }

    async fn list_pending(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(collect_sorted(&state, Some(TaskStatus::Pending), created_key))
    }

    async fn list_completed(&self) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(collect_sorted(
            &state,
            Some(TaskStatus::Completed),
            completed_key,
        ))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }
}
