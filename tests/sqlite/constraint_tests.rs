//! Table constraints and triggers, exercised with raw SQL that bypasses the
//! repository's own validation.

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rstest::rstest;
use tasktrack::task::ports::TaskRepository;

use super::helpers::{FileStore, file_store};

fn execute(connection: &mut SqliteConnection, statement: &str) -> QueryResult<usize> {
    diesel::sql_query(statement).execute(connection)
}

#[rstest]
#[case::blank_description("INSERT INTO tasks (description, status) VALUES ('   ', 'pending')")]
#[case::unknown_status("INSERT INTO tasks (description, status) VALUES ('x', 'archived')")]
#[case::pending_with_completion_time(
    "INSERT INTO tasks (description, status, completed_at) \
     VALUES ('x', 'pending', '2026-01-01 00:00:00.000')"
)]
#[case::completed_without_completion_time(
    "INSERT INTO tasks (description, status) VALUES ('x', 'completed')"
)]
#[case::missing_description("INSERT INTO tasks (status) VALUES ('pending')")]
fn invalid_rows_are_rejected(
    file_store: eyre::Result<FileStore>,
    #[case] statement: &str,
) -> eyre::Result<()> {
    let store = file_store?;
    let mut connection = store.raw_connection()?;

    let result = execute(&mut connection, statement);

    assert!(result.is_err(), "statement unexpectedly succeeded: {statement}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_at_cannot_be_rewritten(file_store: eyre::Result<FileStore>) -> eyre::Result<()> {
    let store = file_store?;
    let task = store.repo.create_task("Fixed in time").await?;
    let mut connection = store.raw_connection()?;

    let result = execute(
        &mut connection,
        &format!(
            "UPDATE tasks SET created_at = '2000-01-01 00:00:00.000' WHERE id = {}",
            task.id()
        ),
    );

    assert!(result.is_err(), "created_at was rewritten");
    let stored = store.repo.find_by_id(task.id()).await?;
    assert_eq!(stored.map(|found| found.created_at()), Some(task.created_at()));
    Ok(())
}

#[rstest]
#[case::reopen("UPDATE tasks SET status = 'pending', completed_at = NULL WHERE id = {id}")]
#[case::recomplete("UPDATE tasks SET completed_at = '2000-01-01 00:00:00.000' WHERE id = {id}")]
#[tokio::test(flavor = "multi_thread")]
async fn completed_tasks_are_final(
    file_store: eyre::Result<FileStore>,
    #[case] template: &str,
) -> eyre::Result<()> {
    let store = file_store?;
    let task = store.repo.create_task("Done and dusted").await?;
    assert!(store.repo.mark_completed(task.id()).await?);
    let before = store.repo.find_by_id(task.id()).await?;
    let mut connection = store.raw_connection()?;

    let statement = template.replace("{id}", &task.id().to_string());
    let result = execute(&mut connection, &statement);

    assert!(result.is_err(), "completed task was modified: {statement}");
    assert_eq!(store.repo.find_by_id(task.id()).await?, before);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_description_updates_are_allowed(
    file_store: eyre::Result<FileStore>,
) -> eyre::Result<()> {
    let store = file_store?;
    let task = store.repo.create_task("Draft").await?;
    let mut connection = store.raw_connection()?;

    let updated = execute(
        &mut connection,
        &format!("UPDATE tasks SET description = 'Final' WHERE id = {}", task.id()),
    )?;

    assert_eq!(updated, 1);
    let stored = store.repo.find_by_id(task.id()).await?;
    assert_eq!(
        stored.map(|found| found.description().as_str().to_owned()),
        Some("Final".to_owned())
    );
    Ok(())
}
