//! Command-line front end for the task tracker.
//!
//! Usage:
//!
//! ```text
//! tasktrack [--db <PATH>] [--log-level <LEVEL>] <command>
//! ```
//!
//! Commands are `add`, `complete`, `delete`, `list`, and `show`. The database
//! defaults to `data/todos.db`; pass `:memory:` for a throwaway store.

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tasktrack::logging::init_subscriber;
use tasktrack::task::{
    adapters::sqlite::{DatabaseLocation, SqliteConfig, SqliteTaskRepository},
    domain::{Task, TaskId},
    ports::TaskRepositoryError,
    services::{TaskBoardError, TaskBoardService, TaskForm, ViewMode},
};
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const DETAIL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Task tracker command-line interface.
#[derive(Debug, Parser)]
#[command(name = "tasktrack", version, about = "Track tasks in a SQLite database")]
struct Cli {
    /// Database file path, or `:memory:`.
    #[arg(long, env = "TASKTRACK_DB", default_value = "data/todos.db")]
    db: String,

    /// Milliseconds a writer waits on a locked database.
    #[arg(
        long,
        env = "TASKTRACK_BUSY_TIMEOUT_MS",
        default_value_t = SqliteConfig::DEFAULT_BUSY_TIMEOUT_MS
    )]
    busy_timeout_ms: u32,

    /// Log level used when `RUST_LOG` is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Add a new task.
    Add {
        /// Task description.
        description: String,
    },
    /// Mark a task as completed.
    Complete {
        /// Task identifier.
        id: i64,
    },
    /// Delete a task permanently.
    Delete {
        /// Task identifier.
        id: i64,
    },
    /// List tasks.
    List {
        /// Which tasks to show: active, completed, or all.
        #[arg(long, default_value = "all")]
        view: ViewMode,
        /// Print tasks as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show one task in detail.
    Show {
        /// Task identifier.
        id: i64,
        /// Print the task as JSON.
        #[arg(long)]
        json: bool,
    },
}

/// Errors that end the command with a failure exit code.
#[derive(Debug, Error)]
enum CliError {
    #[error("failed to initialize database: {0}")]
    Open(#[source] TaskRepositoryError),
    #[error("failed to prepare database directory: {0}")]
    Prepare(#[source] io::Error),
    #[error(transparent)]
    Board(#[from] TaskBoardError),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}

type TaskBoard = TaskBoardService<SqliteTaskRepository>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_subscriber(&cli.log_level);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Err(write_err) = writeln!(io::stderr().lock(), "Error: {err}") {
                tracing::error!(error = %err, %write_err, "failed to report error");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = SqliteConfig::new(DatabaseLocation::parse(&cli.db))
        .with_busy_timeout_ms(cli.busy_timeout_ms);
    prepare_location(config.location())?;

    let repository = SqliteTaskRepository::open(config).map_err(CliError::Open)?;
    let board = TaskBoardService::new(Arc::new(repository));
    let mut out = io::stdout().lock();

    match cli.command {
        Command::Add { description } => add(&board, description, &mut out).await,
        Command::Complete { id } => complete(&board, TaskId::new(id), &mut out).await,
        Command::Delete { id } => delete(&board, TaskId::new(id), &mut out).await,
        Command::List { view, json } => list(&board, view, json, &mut out).await,
        Command::Show { id, json } => show(&board, TaskId::new(id), json, &mut out).await,
    }
}

fn prepare_location(location: &DatabaseLocation) -> Result<(), CliError> {
    let Some(parent) = location.path().and_then(std::path::Path::parent) else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    std::fs::create_dir_all(parent).map_err(CliError::Prepare)
}

async fn add(board: &TaskBoard, description: String, out: &mut impl Write) -> Result<(), CliError> {
    let task = board
        .create_from_form(&TaskForm::with_description(description))
        .await?;
    writeln!(out, "Created task {}: {}", task.id(), task.description())?;
    Ok(())
}

async fn complete(board: &TaskBoard, id: TaskId, out: &mut impl Write) -> Result<(), CliError> {
    if !board.complete_task(id).await? {
        return Err(CliError::Rejected(format!(
            "Failed to complete task {id}. Task may not exist or is already completed."
        )));
    }
    writeln!(out, "Task {id} marked as completed.")?;
    Ok(())
}

async fn delete(board: &TaskBoard, id: TaskId, out: &mut impl Write) -> Result<(), CliError> {
    if !board.delete_task(id).await? {
        return Err(CliError::Rejected(format!("Task {id} not found.")));
    }
    writeln!(out, "Task {id} deleted.")?;
    Ok(())
}

async fn list(
    board: &TaskBoard,
    view: ViewMode,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let tasks = board.tasks_for_view(view).await?;
    if json {
        serde_json::to_writer_pretty(&mut *out, &tasks)?;
        writeln!(out)?;
        return Ok(());
    }

    let heading = match view {
        ViewMode::Active => "Pending Tasks:",
        ViewMode::Completed => "Completed Tasks:",
        ViewMode::All => "All Tasks:",
    };
    writeln!(out, "{heading}")?;
    if tasks.is_empty() {
        writeln!(out, "  No tasks found.")?;
        return Ok(());
    }
    for task in &tasks {
        writeln!(out, "  {}", summary_line(task))?;
    }
    Ok(())
}

async fn show(
    board: &TaskBoard,
    id: TaskId,
    json: bool,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let Some(task) = board.task(id).await? else {
        return Err(CliError::Rejected(format!("Task {id} not found.")));
    };
    if json {
        serde_json::to_writer_pretty(&mut *out, &task)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Task {}:", task.id())?;
    writeln!(out, "  {} {}", status_marker(&task), task.description())?;
    writeln!(out, "  Status: {}", task.status())?;
    writeln!(
        out,
        "  Created: {}",
        task.created_at().format(DETAIL_TIMESTAMP_FORMAT)
    )?;
    if let Some(completed_at) = task.completed_at() {
        writeln!(
            out,
            "  Completed: {}",
            completed_at.format(DETAIL_TIMESTAMP_FORMAT)
        )?;
    }
    Ok(())
}

const fn status_marker(task: &Task) -> &'static str {
    if task.is_completed() { "✓" } else { "○" }
}

fn summary_line(task: &Task) -> String {
    let created = task.created_at().format(TIMESTAMP_FORMAT);
    match task.completed_at() {
        Some(completed_at) => format!(
            "{} [{}] {} (created: {created}, completed: {})",
            status_marker(task),
            task.id(),
            task.description(),
            completed_at.format(TIMESTAMP_FORMAT)
        ),
        None => format!(
            "{} [{}] {} (created: {created})",
            status_marker(task),
            task.id(),
            task.description()
        ),
    }
}
