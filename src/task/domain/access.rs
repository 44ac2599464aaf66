//! Authorization predicates for task actions.
//!
//! Roles are two independent flags on the user; ownership is derived from
//! the task. No role implies another, and no action is granted by more than
//! one rule.

use super::{Task, TaskDomainError};
use crate::user::domain::User;

/// An action a user attempts on a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskAction<'a> {
    /// Create a new task.
    Create,
    /// Become the assignee of the task.
    Claim(&'a Task),
    /// Complete the task with a report.
    Close(&'a Task),
    /// Rewrite the report of an open task.
    Edit(&'a Task),
}

/// Returns whether the user holds the customer role.
#[must_use]
pub const fn is_customer(user: &User) -> bool {
    user.is_customer()
}

/// Returns whether the user holds the employee role.
#[must_use]
pub const fn is_employee(user: &User) -> bool {
    user.is_employee()
}

/// Returns whether the user is the task's current assignee.
#[must_use]
pub fn is_assignee(user: &User, task: &Task) -> bool {
    task.assignee() == Some(user.id())
}

/// Returns whether the user is the task's customer or assignee.
#[must_use]
pub fn is_participant(user: &User, task: &Task) -> bool {
    task.customer() == user.id() || is_assignee(user, task)
}

/// Decides whether `user` may perform `action`.
///
/// # Errors
///
/// Returns the [`TaskDomainError`] naming the failed rule: `NotCustomer`
/// for creation, `NotEmployee` for claiming, and `NotAssignee` or
/// `TaskCompleted` for closing and editing.
pub fn authorize(user: &User, action: TaskAction<'_>) -> Result<(), TaskDomainError> {
    match action {
        TaskAction::Create if !is_customer(user) => Err(TaskDomainError::NotCustomer(user.id())),
        TaskAction::Claim(_) if !is_employee(user) => {
            Err(TaskDomainError::NotEmployee(user.id()))
        }
        TaskAction::Close(task) | TaskAction::Edit(task) => ensure_open_assignee(user, task),
        TaskAction::Create | TaskAction::Claim(_) => Ok(()),
    }
}

fn ensure_open_assignee(user: &User, task: &Task) -> Result<(), TaskDomainError> {
    if !is_assignee(user, task) {
        return Err(TaskDomainError::NotAssignee {
            task_id: task.id(),
            user_id: user.id(),
        });
    }
    if task.status().is_terminal() {
        return Err(TaskDomainError::TaskCompleted(task.id()));
    }
    Ok(())
}
