//! Service layer for task creation, claiming, closing, and report edits.
//!
//! Every mutating operation follows the same shape: load the task, let the
//! domain decide, then write back conditionally on the revision that was
//! read. A writer that loses the race reports [`TaskLifecycleError::Conflict`].

use crate::failure::FailureKind;
use crate::task::{
    domain::{Task, TaskDomainError, TaskId, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::user::domain::User;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// A lifecycle guard rejected the action or its input.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Another writer changed the task between read and write.
    #[error("task {0} was modified concurrently")]
    Conflict(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

impl TaskLifecycleError {
    /// Returns the caller-facing failure category.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::NotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                FailureKind::NotFound
            }
            Self::Conflict(_) | Self::Repository(TaskRepositoryError::RevisionMismatch { .. }) => {
                FailureKind::Conflict
            }
            Self::Repository(
                TaskRepositoryError::DuplicateTask(_) | TaskRepositoryError::Persistence(_),
            ) => FailureKind::Internal,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a waiting task owned by `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the requester is not a
    /// customer or the title is invalid, and
    /// [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn create_task(
        &self,
        requester: &User,
        title: impl Into<String>,
    ) -> TaskLifecycleResult<Task> {
        let task = TaskTitle::new(title)
            .and_then(|valid_title| Task::create(requester, valid_title, &*self.clock))
            .inspect_err(|err| {
                debug!(user_id = %requester.id(), error = %err, "task creation rejected");
            })?;
        self.repository.store(&task).await?;
        info!(
            task_id = %task.id(),
            user_id = %requester.id(),
            title = %task.title(),
            "task created"
        );
        Ok(task)
    }

    /// Assigns a waiting task to `requester`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task,
    /// [`TaskLifecycleError::Domain`] when the task is already claimed or the
    /// requester is not an employee, and [`TaskLifecycleError::Conflict`] when
    /// a concurrent claim wins the race.
    pub async fn claim_task(&self, requester: &User, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let task = self
            .mutate(task_id, "claim", |task, clock| task.claim(requester, clock))
            .await?;
        info!(task_id = %task_id, user_id = %requester.id(), "task claimed");
        Ok(task)
    }

    /// Completes an in-progress task with its final report.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task,
    /// [`TaskLifecycleError::Domain`] when the requester is not the open
    /// assignee or `report` is `None`, and [`TaskLifecycleError::Conflict`]
    /// when the task changed concurrently.
    pub async fn close_task(
        &self,
        requester: &User,
        task_id: TaskId,
        report: Option<String>,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .mutate(task_id, "close", |task, clock| {
                task.close(requester, report, clock)
            })
            .await?;
        info!(task_id = %task_id, user_id = %requester.id(), "task completed");
        Ok(task)
    }

    /// Rewrites the report of an open task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for an unknown task,
    /// [`TaskLifecycleError::Domain`] when the requester is not the assignee
    /// or the task is completed, and [`TaskLifecycleError::Conflict`] when
    /// the task changed concurrently.
    pub async fn edit_task(
        &self,
        requester: &User,
        task_id: TaskId,
        report: Option<String>,
    ) -> TaskLifecycleResult<Task> {
        let task = self
            .mutate(task_id, "edit", |task, clock| {
                task.edit_report(requester, report, clock)
            })
            .await?;
        info!(task_id = %task_id, user_id = %requester.id(), "task report edited");
        Ok(task)
    }

    /// Lists the tasks `requester` owns or works on, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn list_tasks_for(&self, requester: &User) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_by_participant(requester.id()).await?)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] when the task does not exist
    /// and [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn get_task(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    async fn mutate<F>(
        &self,
        task_id: TaskId,
        action: &'static str,
        apply: F,
    ) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, &C) -> Result<(), TaskDomainError>,
    {
        let mut task = self.get_task(task_id).await?;
        let expected_revision = task.revision();
        if let Err(err) = apply(&mut task, &*self.clock) {
            debug!(task_id = %task_id, action, error = %err, "task action rejected");
            return Err(err.into());
        }

        match self.repository.update(&task, expected_revision).await {
            Ok(()) => Ok(task),
            Err(TaskRepositoryError::RevisionMismatch { .. }) => {
                debug!(task_id = %task_id, action, "task action lost revision race");
                Err(TaskLifecycleError::Conflict(task_id))
            }
            Err(TaskRepositoryError::NotFound(_)) => Err(TaskLifecycleError::NotFound(task_id)),
            Err(err) => Err(err.into()),
        }
    }
}
