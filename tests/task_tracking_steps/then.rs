//! Then steps for task tracking BDD scenarios.

use super::world::{TaskTrackingWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use tasktrack::task::services::{TaskBoardError, TaskFormError, ViewMode};

fn descriptions(world: &TaskTrackingWorld, view: ViewMode) -> Result<Vec<String>, eyre::Report> {
    let tasks = run_async(world.board.tasks_for_view(view)).wrap_err("load view")?;
    Ok(tasks
        .iter()
        .map(|task| task.description().as_str().to_owned())
        .collect())
}

fn view_lists(
    world: &TaskTrackingWorld,
    view: ViewMode,
    description: &str,
) -> Result<(), eyre::Report> {
    let listed = descriptions(world, view)?;
    if listed != [description] {
        return Err(eyre::eyre!(
            "expected {view} view to list only {description:?}, found {listed:?}"
        ));
    }
    Ok(())
}

fn view_is_empty(world: &TaskTrackingWorld, view: ViewMode) -> Result<(), eyre::Report> {
    let listed = descriptions(world, view)?;
    if !listed.is_empty() {
        return Err(eyre::eyre!("expected empty {view} view, found {listed:?}"));
    }
    Ok(())
}

#[then(r#"the active view lists "{description}""#)]
fn active_view_lists(world: &TaskTrackingWorld, description: String) -> Result<(), eyre::Report> {
    view_lists(world, ViewMode::Active, &description)
}

#[then(r#"the completed view lists "{description}""#)]
fn completed_view_lists(
    world: &TaskTrackingWorld,
    description: String,
) -> Result<(), eyre::Report> {
    view_lists(world, ViewMode::Completed, &description)
}

#[then("the active view is empty")]
fn active_view_empty(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    view_is_empty(world, ViewMode::Active)
}

#[then("the all view is empty")]
fn all_view_empty(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    view_is_empty(world, ViewMode::All)
}

#[then("the task has a completion time")]
fn task_has_completion_time(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    let id = world.current_id()?;
    let task = run_async(world.board.task(id))
        .wrap_err("look up task")?
        .ok_or_else(|| eyre::eyre!("task {id} is missing"))?;
    let completed_at = task
        .completed_at()
        .ok_or_else(|| eyre::eyre!("task {id} has no completion time"))?;
    if completed_at < task.created_at() {
        return Err(eyre::eyre!("task {id} completed before it was created"));
    }
    Ok(())
}

#[then("completing succeeded")]
fn completing_succeeded(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    expect_outcome("complete", world.last_completed, true)
}

#[then("completing was refused")]
fn completing_refused(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    expect_outcome("complete", world.last_completed, false)
}

#[then("deleting succeeded")]
fn deleting_succeeded(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    expect_outcome("delete", world.last_deleted, true)
}

#[then("deleting was refused")]
fn deleting_refused(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    expect_outcome("delete", world.last_deleted, false)
}

#[then("the submission is rejected as empty")]
fn submission_rejected(world: &TaskTrackingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_created
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing submission result"))?;
    if !matches!(
        result,
        Err(TaskBoardError::Form(TaskFormError::EmptyDescription))
    ) {
        return Err(eyre::eyre!("expected empty description error, got {result:?}"));
    }
    Ok(())
}

fn expect_outcome(
    operation: &str,
    outcome: Option<bool>,
    expected: bool,
) -> Result<(), eyre::Report> {
    match outcome {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(eyre::eyre!(
            "expected {operation} to return {expected}, got {actual}"
        )),
        None => Err(eyre::eyre!("no {operation} result recorded")),
    }
}
