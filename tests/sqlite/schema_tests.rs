//! Schema creation, version reporting, and removal.

use diesel::prelude::*;
use diesel::sql_types::Text;
use rstest::rstest;
use tasktrack::task::{
    adapters::sqlite::{SqliteConfig, SqliteTaskRepository, migrations::SCHEMA_VERSION},
    ports::TaskRepository,
};

use super::helpers::{DB_FILE_NAME, FileStore, file_store, memory_repo};

#[derive(Debug, QueryableByName)]
struct SchemaObject {
    #[diesel(sql_type = Text)]
    name: String,
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fresh_repository_reports_schema_version(
    memory_repo: eyre::Result<SqliteTaskRepository>,
) -> eyre::Result<()> {
    let repo = memory_repo?;
    assert_eq!(repo.schema_version().await?, Some(SCHEMA_VERSION));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn ensure_schema_is_idempotent_and_keeps_data(
    memory_repo: eyre::Result<SqliteTaskRepository>,
) -> eyre::Result<()> {
    let repo = memory_repo?;
    let task = repo.create_task("Keep me").await?;

    repo.ensure_schema().await?;
    repo.ensure_schema().await?;

    assert_eq!(repo.find_by_id(task.id()).await?, Some(task));
    assert_eq!(repo.schema_version().await?, Some(SCHEMA_VERSION));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dropped_schema_fails_operations_until_restored(
    memory_repo: eyre::Result<SqliteTaskRepository>,
) -> eyre::Result<()> {
    let repo = memory_repo?;
    repo.create_task("Doomed").await?;

    repo.drop_schema().await?;
    assert_eq!(repo.schema_version().await?, None);

    let listing = repo.list_all().await;
    assert!(
        listing.as_ref().is_err_and(|err| err.is_persistence()),
        "expected persistence error, got {listing:?}"
    );
    let created = repo.create_task("Nowhere to go").await;
    assert!(
        created.as_ref().is_err_and(|err| err.is_persistence()),
        "expected persistence error, got {created:?}"
    );

    repo.ensure_schema().await?;
    assert!(repo.list_all().await?.is_empty());
    assert_eq!(repo.schema_version().await?, Some(SCHEMA_VERSION));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drop_schema_twice_is_harmless(
    memory_repo: eyre::Result<SqliteTaskRepository>,
) -> eyre::Result<()> {
    let repo = memory_repo?;
    repo.drop_schema().await?;
    repo.drop_schema().await?;
    assert_eq!(repo.schema_version().await?, None);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn schema_creation_can_be_deferred() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let config = SqliteConfig::file(dir.path().join(DB_FILE_NAME)).with_auto_create_schema(false);
    let repo = SqliteTaskRepository::open(config)?;

    assert_eq!(repo.schema_version().await?, None);
    assert!(repo.create_task("Too early").await.is_err());

    repo.ensure_schema().await?;
    let task = repo.create_task("Right on time").await?;
    assert_eq!(task.description().as_str(), "Right on time");
    Ok(())
}

#[rstest]
fn schema_creates_expected_indexes_and_triggers(
    file_store: eyre::Result<FileStore>,
) -> eyre::Result<()> {
    let store = file_store?;
    let mut connection = store.raw_connection()?;

    let objects: Vec<SchemaObject> = diesel::sql_query(
        "SELECT name FROM sqlite_master \
         WHERE type IN ('index', 'trigger') AND tbl_name = 'tasks' \
         AND name NOT LIKE 'sqlite_%' ORDER BY name",
    )
    .load(&mut connection)?;
    let names: Vec<&str> = objects.iter().map(|object| object.name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "idx_tasks_completed_at",
            "idx_tasks_created_at",
            "idx_tasks_status",
            "trg_tasks_completion_final",
            "trg_tasks_created_at_immutable",
        ]
    );
    Ok(())
}
