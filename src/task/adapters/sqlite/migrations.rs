//! Schema management for the task store.
//!
//! The DDL lives in `migrations/` at the crate root. Each operation runs in a
//! single immediate transaction, so a failure leaves nothing half-created.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel::sqlite::SqliteConnection;

use crate::task::ports::{TaskRepositoryError, TaskRepositoryResult};

/// DDL creating the tasks table, its indexes, and guard triggers.
pub const CREATE_TASKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-19-000000_create_tasks/up.sql");

/// DDL removing the indexes and then the tasks table.
pub const DROP_TASKS_SQL: &str =
    include_str!("../../../../migrations/2026-10-19-000000_create_tasks/down.sql");

/// Version reported once the tasks table exists.
pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(QueryableByName)]
struct TableName {
    #[diesel(sql_type = Text)]
    name: String,
}

/// Creates the tasks table, indexes, and triggers when they are absent.
///
/// Safe to call repeatedly.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Persistence`] when any statement fails; the
/// whole operation is rolled back.
pub fn ensure_schema(connection: &mut SqliteConnection) -> TaskRepositoryResult<()> {
    connection
        .immediate_transaction(|conn| conn.batch_execute(CREATE_TASKS_SQL))
        .map_err(TaskRepositoryError::persistence)?;
    tracing::debug!(version = SCHEMA_VERSION, "task schema ensured");
    Ok(())
}

/// Drops the task indexes and table.
///
/// Intended for tests and support tooling.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Persistence`] when any statement fails; the
/// whole operation is rolled back.
pub fn drop_schema(connection: &mut SqliteConnection) -> TaskRepositoryResult<()> {
    connection
        .immediate_transaction(|conn| conn.batch_execute(DROP_TASKS_SQL))
        .map_err(TaskRepositoryError::persistence)?;
    tracing::debug!("task schema dropped");
    Ok(())
}

/// Returns the schema version, or `None` when the tasks table is missing.
///
/// # Errors
///
/// Returns [`TaskRepositoryError::Persistence`] when the catalogue query
/// fails.
pub fn schema_version(
    connection: &mut SqliteConnection,
) -> TaskRepositoryResult<Option<&'static str>> {
    let table = diesel::sql_query(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'tasks'",
    )
    .get_result::<TableName>(connection)
    .optional()
    .map_err(TaskRepositoryError::persistence)?;
    Ok(table
        .filter(|row| row.name == "tasks")
        .map(|_| SCHEMA_VERSION))
}
