//! `SQLite` repository implementation for task storage.

use super::{
    connection::{ConnectionProvider, SqliteConfig},
    migrations,
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{PersistedTaskData, Task, TaskDescription, TaskId, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Timestamp};
use diesel::sqlite::SqliteConnection;

/// Storage clock expression with millisecond resolution, matching the column
/// default used for `created_at`.
const STORAGE_NOW_SQL: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

/// `SQLite`-backed task repository.
///
/// Cloning is cheap and clones share the underlying connection strategy. For
/// an in-memory database the data lives until the last clone is dropped.
///
/// Rows with equal timestamps are ordered by descending identifier.
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    provider: ConnectionProvider,
}

impl SqliteTaskRepository {
    /// Opens a repository for the configured database.
    ///
    /// Creates the schema first when [`SqliteConfig::auto_create_schema`] is
    /// set.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the database cannot
    /// be opened or the schema cannot be created.
    pub fn open(config: SqliteConfig) -> TaskRepositoryResult<Self> {
        let provider = ConnectionProvider::for_config(&config)?;
        if config.auto_create_schema() {
            provider.with_connection(migrations::ensure_schema)?;
        }
        tracing::debug!(location = %config.location(), ?provider, "task repository opened");
        Ok(Self { provider })
    }

    /// Opens a repository over a fresh in-memory database with the schema
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the database cannot
    /// be created.
    pub fn in_memory() -> TaskRepositoryResult<Self> {
        Self::open(SqliteConfig::in_memory())
    }

    /// Creates the task schema if it is missing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when schema creation
    /// fails; nothing partial is kept.
    pub async fn ensure_schema(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(migrations::ensure_schema).await
    }

    /// Drops the task schema, deleting all stored tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the drop fails;
    /// nothing partial is kept.
    pub async fn drop_schema(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(migrations::drop_schema).await
    }

    /// Returns the schema version, or `None` when the schema is absent.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the lookup fails.
    pub async fn schema_version(&self) -> TaskRepositoryResult<Option<&'static str>> {
        self.run_blocking(migrations::schema_version).await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let provider = self.provider.clone();
        tokio::task::spawn_blocking(move || provider.with_connection(f))
            .await
            .map_err(TaskRepositoryError::persistence)?
    }

    async fn load_tasks(
        &self,
        query: impl FnOnce(&mut SqliteConnection) -> QueryResult<Vec<TaskRow>> + Send + 'static,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let rows = self
            .run_blocking(move |connection| {
                query(connection).map_err(TaskRepositoryError::persistence)
            })
            .await?;
        rows.into_iter().map(row_to_task).collect()
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create_task(&self, description: &str) -> TaskRepositoryResult<Task> {
        let validated = TaskDescription::new(description)?;

        let row = self
            .run_blocking(move |connection| {
                connection
                    .immediate_transaction(|conn| {
                        diesel::insert_into(tasks::table)
                            .values(&NewTaskRow {
                                description: validated.as_str(),
                                status: TaskStatus::Pending.as_str(),
                            })
                            .returning(TaskRow::as_returning())
                            .get_result::<TaskRow>(conn)
                    })
                    .map_err(TaskRepositoryError::persistence)
            })
            .await?;

        let task = row_to_task(row)?;
        tracing::debug!(task_id = %task.id(), "created task");
        Ok(task)
    }

    async fn mark_completed(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let changed = self
            .run_blocking(move |connection| {
                connection
                    .immediate_transaction(|conn| {
                        diesel::update(
                            tasks::table
                                .filter(tasks::id.eq(id.value()))
                                .filter(tasks::status.eq(TaskStatus::Pending.as_str())),
                        )
                        .set((
                            tasks::status.eq(TaskStatus::Completed.as_str()),
                            tasks::completed_at.eq(sql::<Nullable<Timestamp>>(STORAGE_NOW_SQL)),
                        ))
                        .execute(conn)
                    })
                    .map_err(TaskRepositoryError::persistence)
            })
            .await?;

        tracing::debug!(task_id = %id, changed, "mark completed");
        Ok(changed == 1)
    }

    async fn delete_task(&self, id: TaskId) -> TaskRepositoryResult<bool> {
        let removed = self
            .run_blocking(move |connection| {
                connection
                    .immediate_transaction(|conn| {
                        diesel::delete(tasks::table.filter(tasks::id.eq(id.value())))
                            .execute(conn)
                    })
                    .map_err(TaskRepositoryError::persistence)
            })
            .await?;

        tracing::debug!(task_id = %id, removed, "delete task");
        Ok(removed == 1)
    }

    async fn list_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.load_tasks(|conn| {
            tasks::table
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load(conn)
        })
        .await
    }

    async fn list_pending(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.load_tasks(|conn| {
            tasks::table
                .filter(tasks::status.eq(TaskStatus::Pending.as_str()))
                .order((tasks::created_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load(conn)
        })
        .await
    }

    async fn list_completed(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.load_tasks(|conn| {
            tasks::table
                .filter(tasks::status.eq(TaskStatus::Completed.as_str()))
                .order((tasks::completed_at.desc(), tasks::id.desc()))
                .select(TaskRow::as_select())
                .load(conn)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let row = self
            .run_blocking(move |connection| {
                tasks::table
                    .filter(tasks::id.eq(id.value()))
                    .select(TaskRow::as_select())
                    .first::<TaskRow>(connection)
                    .optional()
                    .map_err(TaskRepositoryError::persistence)
            })
            .await?;
        row.map(row_to_task).transpose()
    }
}

/// Converts a stored row into a validated task.
///
/// A row that fails domain validation means storage was corrupted, so the
/// failure is reported as a persistence error rather than a validation one.
fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        description,
        status: persisted_status,
        created_at,
        completed_at,
    } = row;

    let status = TaskStatus::try_from(persisted_status.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::new(id),
        description,
        status,
        created_at: created_at.and_utc(),
        completed_at: completed_at.map(|timestamp| timestamp.and_utc()),
    };
    Task::from_persisted(data).map_err(TaskRepositoryError::persistence)
}
