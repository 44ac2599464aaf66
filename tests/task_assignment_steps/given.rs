//! Given steps for task assignment BDD scenarios.

use super::world::{TaskAssignmentWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskdesk::user::{domain::RoleFlags, services::RegisterUserRequest};

fn register(
    world: &mut TaskAssignmentWorld,
    name: String,
    roles: RoleFlags,
) -> Result<(), eyre::Report> {
    let phone = format!("+1555{:07}", world.next_phone_suffix);
    world.next_phone_suffix += 1;
    let request = RegisterUserRequest::new(name.as_str(), phone, "brass-lantern-42", roles);
    let user = run_async(world.directory.register(request))
        .wrap_err_with(|| format!("register scenario user {name}"))?;
    world.users.insert(name, user);
    Ok(())
}

#[given(r#"a registered customer "{name}""#)]
fn registered_customer(world: &mut TaskAssignmentWorld, name: String) -> Result<(), eyre::Report> {
    register(world, name, RoleFlags::customer())
}

#[given(r#"a registered employee "{name}""#)]
fn registered_employee(world: &mut TaskAssignmentWorld, name: String) -> Result<(), eyre::Report> {
    register(world, name, RoleFlags::employee())
}

#[given(r#""{name}" has created a task titled "{title}""#)]
fn has_created_task(
    world: &mut TaskAssignmentWorld,
    name: String,
    title: String,
) -> Result<(), eyre::Report> {
    let customer = world.user(&name)?;
    let task = run_async(world.tasks.create_task(&customer, title))
        .wrap_err("create task in scenario setup")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{name}" has claimed the task"#)]
fn has_claimed_task(world: &mut TaskAssignmentWorld, name: String) -> Result<(), eyre::Report> {
    let employee = world.user(&name)?;
    let task_id = world.task()?.id();
    let task = run_async(world.tasks.claim_task(&employee, task_id))
        .wrap_err("claim task in scenario setup")?;
    world.current_task = Some(task);
    Ok(())
}

#[given(r#""{name}" has closed the task with report "{report}""#)]
fn has_closed_task(
    world: &mut TaskAssignmentWorld,
    name: String,
    report: String,
) -> Result<(), eyre::Report> {
    let assignee = world.user(&name)?;
    let task_id = world.task()?.id();
    let task = run_async(world.tasks.close_task(&assignee, task_id, Some(report)))
        .wrap_err("close task in scenario setup")?;
    world.current_task = Some(task);
    Ok(())
}
