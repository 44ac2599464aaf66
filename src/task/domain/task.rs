//! Task aggregate root and its status machine.

use super::{
    ParseTaskStatusError, TaskAction, TaskDomainError, TaskId, TaskRevision, authorize,
};
use crate::user::domain::{User, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Created and waiting for an employee to claim it.
    Waiting,
    /// Claimed and being worked on by the assignee.
    InProgress,
    /// Closed by the assignee with a report.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "WAITING",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
        }
    }

    /// Returns whether moving to `target` is a legal transition.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Waiting, Self::InProgress) | (Self::InProgress, Self::Completed)
        )
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "WAITING" => Ok(Self::Waiting),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskTitle(String);

impl TaskTitle {
    const MAX_LENGTH: usize = 100;

    /// Creates a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the trimmed value is empty
    /// and [`TaskDomainError::TitleTooLong`] beyond 100 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(TaskDomainError::TitleTooLong(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TaskTitle {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TaskTitle> for String {
    fn from(value: TaskTitle) -> Self {
        value.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    customer: UserId,
    assignee: Option<UserId>,
    status: TaskStatus,
    report: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    closed_at: Option<DateTime<Utc>>,
    revision: TaskRevision,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Owning customer.
    pub customer: UserId,
    /// Assigned employee, if claimed.
    pub assignee: Option<UserId>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted report text.
    pub report: Option<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest mutation timestamp.
    pub updated_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// Persisted revision.
    pub revision: TaskRevision,
}

impl Task {
    /// Creates a waiting task owned by `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotCustomer`] unless the requester holds the
    /// customer role.
    pub fn create(
        requester: &User,
        title: TaskTitle,
        clock: &impl Clock,
    ) -> Result<Self, TaskDomainError> {
        authorize(requester, TaskAction::Create)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title,
            customer: requester.id(),
            assignee: None,
            status: TaskStatus::Waiting,
            report: None,
            created_at: timestamp,
            updated_at: timestamp,
            closed_at: None,
            revision: TaskRevision::INITIAL,
        })
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::CorruptTask`] when the data breaks the
    /// status, assignee, or completion-timestamp invariants.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, TaskDomainError> {
        let corrupt = |reason| TaskDomainError::CorruptTask {
            task_id: data.id,
            reason,
        };
        let is_waiting = data.status == TaskStatus::Waiting;
        if is_waiting == data.assignee.is_some() {
            return Err(corrupt("assignee must be set exactly when not waiting"));
        }
        let is_completed = data.status == TaskStatus::Completed;
        if is_completed != data.closed_at.is_some() {
            return Err(corrupt("closed_at must be set exactly when completed"));
        }

        Ok(Self {
            id: data.id,
            title: data.title,
            customer: data.customer,
            assignee: data.assignee,
            status: data.status,
            report: data.report,
            created_at: data.created_at,
            updated_at: data.updated_at,
            closed_at: data.closed_at,
            revision: data.revision,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the owning customer.
    #[must_use]
    pub const fn customer(&self) -> UserId {
        self.customer
    }

    /// Returns the assignee, if claimed.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the report text, if any.
    #[must_use]
    pub fn report(&self) -> Option<&str> {
        self.report.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the completion timestamp, if completed.
    #[must_use]
    pub const fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Returns the current revision.
    #[must_use]
    pub const fn revision(&self) -> TaskRevision {
        self.revision
    }

    /// Assigns the task to `requester` and starts work on it.
    ///
    /// The unclaimed check runs before the role check, so a taken task always
    /// reports [`TaskDomainError::AlreadyClaimed`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AlreadyClaimed`] when an assignee is set and
    /// [`TaskDomainError::NotEmployee`] when the requester lacks the employee
    /// role.
    pub fn claim(&mut self, requester: &User, clock: &impl Clock) -> Result<(), TaskDomainError> {
        if let Some(assignee) = self.assignee {
            return Err(TaskDomainError::AlreadyClaimed {
                task_id: self.id,
                assignee,
            });
        }
        authorize(requester, TaskAction::Claim(self))?;
        self.ensure_transition(TaskStatus::InProgress)?;

        self.assignee = Some(requester.id());
        self.status = TaskStatus::InProgress;
        self.touch(clock.utc());
        Ok(())
    }

    /// Completes the task with a final report.
    ///
    /// An empty report is accepted; only an absent one is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] or
    /// [`TaskDomainError::TaskCompleted`] when the requester may not close
    /// the task, and [`TaskDomainError::MissingReport`] when `report` is
    /// `None`.
    pub fn close(
        &mut self,
        requester: &User,
        report: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        authorize(requester, TaskAction::Close(self))?;
        self.ensure_transition(TaskStatus::Completed)?;
        let final_report = report.ok_or(TaskDomainError::MissingReport(self.id))?;

        let timestamp = clock.utc();
        self.status = TaskStatus::Completed;
        self.report = Some(final_report);
        self.closed_at = Some(timestamp);
        self.touch(timestamp);
        Ok(())
    }

    /// Overwrites the report of an open task; `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAssignee`] or
    /// [`TaskDomainError::TaskCompleted`] when the requester may not edit the
    /// task.
    pub fn edit_report(
        &mut self,
        requester: &User,
        report: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        authorize(requester, TaskAction::Edit(self))?;
        self.report = report;
        self.touch(clock.utc());
        Ok(())
    }

    fn ensure_transition(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(TaskDomainError::InvalidStatusTransition {
            task_id: self.id,
            from: self.status,
            to: target,
        })
    }

    fn touch(&mut self, timestamp: DateTime<Utc>) {
        self.updated_at = timestamp;
        self.revision = self.revision.next();
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
