//! When steps for task tracking BDD scenarios.

use super::world::{TaskTrackingWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use tasktrack::task::services::TaskForm;

#[when(r#"a task "{description}" is submitted"#)]
fn task_submitted(world: &mut TaskTrackingWorld, description: String) {
    let result = run_async(
        world
            .board
            .create_from_form(&TaskForm::with_description(description)),
    );
    if let Ok(ref task) = result {
        world.current_id = Some(task.id());
    }
    world.last_created = Some(result);
}

#[when("the task is completed")]
fn task_completed(world: &mut TaskTrackingWorld) -> Result<(), eyre::Report> {
    complete_current(world)
}

#[when("the missing task is completed")]
fn missing_task_completed(world: &mut TaskTrackingWorld) -> Result<(), eyre::Report> {
    complete_current(world)
}

#[when("the task is deleted")]
fn task_deleted(world: &mut TaskTrackingWorld) -> Result<(), eyre::Report> {
    delete_current(world)
}

#[when("the missing task is deleted")]
fn missing_task_deleted(world: &mut TaskTrackingWorld) -> Result<(), eyre::Report> {
    delete_current(world)
}

fn complete_current(world: &mut TaskTrackingWorld) -> Result<(), eyre::Report> {
    let id = world.current_id()?;
    let completed = run_async(world.board.complete_task(id)).wrap_err("complete task")?;
    world.last_completed = Some(completed);
    Ok(())
}

fn delete_current(world: &mut TaskTrackingWorld) -> Result<(), eyre::Report> {
    let id = world.current_id()?;
    let deleted = run_async(world.board.delete_task(id)).wrap_err("delete task")?;
    world.last_deleted = Some(deleted);
    Ok(())
}
