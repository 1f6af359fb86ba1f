//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    /// Storage-assigned task identifier.
    pub id: i64,
    /// Stored description.
    pub description: String,
    /// Stored lifecycle status.
    pub status: String,
    /// Creation timestamp, UTC.
    pub created_at: NaiveDateTime,
    /// Completion timestamp, UTC.
    pub completed_at: Option<NaiveDateTime>,
}

/// Insert model for task records.
///
/// `created_at` is omitted so the column default supplies the storage clock.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow<'a> {
    /// Trimmed description.
    pub description: &'a str,
    /// Initial lifecycle status.
    pub status: &'a str,
}
