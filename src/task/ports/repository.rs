//! Repository port for task persistence with compare-and-swap updates.

use crate::task::domain::{Task, TaskId, TaskRevision};
use crate::user::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
///
/// # Revision semantics
///
/// - New tasks are stored at [`TaskRevision::INITIAL`].
/// - Each lifecycle mutation advances the revision by one.
/// - [`TaskRepository::update`] succeeds only when the stored revision equals
///   `expected_revision`, so of two writers that read the same snapshot
///   exactly one wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Overwrites the mutable fields of an existing task when its stored
    /// revision still equals `expected_revision`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist
    /// and [`TaskRepositoryError::RevisionMismatch`] when another writer got
    /// there first.
    async fn update(&self, task: &Task, expected_revision: TaskRevision)
    -> TaskRepositoryResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns every task the user owns as customer or works on as assignee,
    /// each once, in insertion order.
    async fn list_by_participant(&self, user_id: UserId) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored revision differs from the one the writer read.
    #[error("revision mismatch for task {task_id}: expected {expected}, found {actual}")]
    RevisionMismatch {
        /// Task identifier.
        task_id: TaskId,
        /// Revision the writer read.
        expected: TaskRevision,
        /// Revision currently stored.
        actual: TaskRevision,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
