//! Then steps for task assignment BDD scenarios.

use super::world::{TaskAssignmentWorld, run_async};
use rstest_bdd_macros::then;
use taskdesk::task::domain::TaskStatus;

/// Re-reads the current task so assertions see stored state.
fn stored_task(
    world: &TaskAssignmentWorld,
) -> Result<taskdesk::task::domain::Task, eyre::Report> {
    let task_id = world.task()?.id();
    Ok(run_async(world.tasks.get_task(task_id))?)
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskAssignmentWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = stored_task(world)?;
    eyre::ensure!(
        task.status() == expected,
        "expected status {expected}, found {}",
        task.status()
    );
    Ok(())
}

#[then(r#"the task is assigned to "{name}""#)]
fn task_is_assigned_to(world: &TaskAssignmentWorld, name: String) -> Result<(), eyre::Report> {
    let expected = world.user(&name)?;
    let task = stored_task(world)?;
    eyre::ensure!(
        task.assignee() == Some(expected.id()),
        "task is not assigned to {name}"
    );
    Ok(())
}

#[then(r#"the task report is "{report}""#)]
fn task_report_is(world: &TaskAssignmentWorld, report: String) -> Result<(), eyre::Report> {
    let task = stored_task(world)?;
    eyre::ensure!(
        task.report() == Some(report.as_str()),
        "expected report {report:?}, found {:?}",
        task.report()
    );
    Ok(())
}

#[then(r#"the last action fails with a "{kind}" failure"#)]
fn last_action_fails(world: &TaskAssignmentWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action result"))?;
    let Err(err) = result else {
        eyre::bail!("expected a {kind} failure, but the action succeeded");
    };
    eyre::ensure!(
        err.kind().as_str() == kind,
        "expected a {kind} failure, got {} ({err})",
        err.kind()
    );
    Ok(())
}

#[then(r#""{name}" sees a task count of {count:usize}"#)]
fn user_sees_task_count(
    world: &TaskAssignmentWorld,
    name: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let user = world.user(&name)?;
    let listed = run_async(world.tasks.list_tasks_for(&user))?;
    eyre::ensure!(
        listed.len() == count,
        "expected {count} tasks for {name}, found {}",
        listed.len()
    );
    Ok(())
}
