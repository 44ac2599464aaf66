//! Error types for task lifecycle guards and parsing.

use super::{TaskId, TaskStatus};
use crate::failure::FailureKind;
use crate::user::domain::UserId;
use thiserror::Error;

/// Errors returned when a lifecycle guard rejects an action or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the 100-character storage limit.
    #[error("task title exceeds 100 character limit: {0}")]
    TitleTooLong(String),

    /// Closing requires a report.
    #[error("task {0} cannot be closed without a report")]
    MissingReport(TaskId),

    /// Only customers may create tasks.
    #[error("user {0} is not a customer")]
    NotCustomer(UserId),

    /// Only employees may claim tasks.
    #[error("user {0} is not an employee")]
    NotEmployee(UserId),

    /// Only the assignee may close or edit a task.
    #[error("user {user_id} is not the assignee of task {task_id}")]
    NotAssignee {
        /// Task identifier.
        task_id: TaskId,
        /// Requesting user.
        user_id: UserId,
    },

    /// Completed tasks are frozen.
    #[error("task {0} is completed and can no longer change")]
    TaskCompleted(TaskId),

    /// Another user already claimed the task.
    #[error("task {task_id} is already taken by {assignee}")]
    AlreadyClaimed {
        /// Task identifier.
        task_id: TaskId,
        /// Current assignee.
        assignee: UserId,
    },

    /// The status machine does not allow the requested transition.
    #[error("invalid status transition for task {task_id}: {} -> {}", .from.as_str(), .to.as_str())]
    InvalidStatusTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// Persisted task data breaks a lifecycle invariant.
    #[error("persisted task {task_id} is inconsistent: {reason}")]
    CorruptTask {
        /// Task identifier.
        task_id: TaskId,
        /// Violated invariant.
        reason: &'static str,
    },
}

impl TaskDomainError {
    /// Returns the caller-facing failure category.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::EmptyTitle | Self::TitleTooLong(_) | Self::MissingReport(_) => {
                FailureKind::Validation
            }
            Self::NotCustomer(_)
            | Self::NotEmployee(_)
            | Self::NotAssignee { .. }
            | Self::TaskCompleted(_) => FailureKind::Forbidden,
            Self::AlreadyClaimed { .. } | Self::InvalidStatusTransition { .. } => {
                FailureKind::Conflict
            }
            Self::CorruptTask { .. } => FailureKind::Internal,
        }
    }
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
