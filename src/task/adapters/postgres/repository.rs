//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::persistence::PgPool;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TaskRevision, TaskStatus, TaskTitle},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// `PostgreSQL`-backed task repository.
///
/// Updates are a single `UPDATE … WHERE id = $1 AND revision = $2`, so the
/// database arbitrates concurrent writers without explicit row locks.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn store(&self, task: &Task) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let new_row = to_new_row(task)?;

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(
        &self,
        task: &Task,
        expected_revision: TaskRevision,
    ) -> TaskRepositoryResult<()> {
        let task_id = task.id();
        let changeset = to_changeset(task)?;
        let expected = revision_to_db(expected_revision)?;

        self.run_blocking(move |connection| {
            let updated_count = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(task_id.into_inner()))
                    .filter(tasks::revision.eq(expected)),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(TaskRepositoryError::persistence)?;

            if updated_count > 0 {
                return Ok(());
            }

            let stored_revision = tasks::table
                .filter(tasks::id.eq(task_id.into_inner()))
                .select(tasks::revision)
                .first::<i64>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            match stored_revision {
                None => Err(TaskRepositoryError::NotFound(task_id)),
                Some(actual) => {
                    debug!(%task_id, expected, actual, "task update lost revision race");
                    Err(TaskRepositoryError::RevisionMismatch {
                        task_id,
                        expected: expected_revision,
                        actual: revision_from_db(actual)?,
                    })
                }
            }
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_by_participant(&self, user_id: UserId) -> TaskRepositoryResult<Vec<Task>> {
        let participant = user_id.into_inner();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::customer_id.eq(participant))
                .or_filter(tasks::assignee_id.eq(participant))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn revision_to_db(revision: TaskRevision) -> TaskRepositoryResult<i64> {
    i64::try_from(revision.value()).map_err(TaskRepositoryError::persistence)
}

fn revision_from_db(revision: i64) -> TaskRepositoryResult<TaskRevision> {
    u64::try_from(revision)
        .map(TaskRevision::new)
        .map_err(TaskRepositoryError::persistence)
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().as_str().to_owned(),
        customer_id: task.customer().into_inner(),
        assignee_id: task.assignee().map(UserId::into_inner),
        status: task.status().as_str().to_owned(),
        report: task.report().map(str::to_owned),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
        closed_at: task.closed_at(),
        revision: revision_to_db(task.revision())?,
    })
}

fn to_changeset(task: &Task) -> TaskRepositoryResult<TaskChangeset> {
    Ok(TaskChangeset {
        assignee_id: task.assignee().map(UserId::into_inner),
        status: task.status().as_str().to_owned(),
        report: task.report().map(str::to_owned),
        updated_at: task.updated_at(),
        closed_at: task.closed_at(),
        revision: revision_to_db(task.revision())?,
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        customer_id,
        assignee_id,
        status: persisted_status,
        report,
        created_at,
        updated_at,
        closed_at,
        revision: persisted_revision,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        customer: UserId::from_uuid(customer_id),
        assignee: assignee_id.map(UserId::from_uuid),
        status,
        report,
        created_at,
        updated_at,
        closed_at,
        revision: revision_from_db(persisted_revision)?,
    };
    Task::from_persisted(data).map_err(TaskRepositoryError::persistence)
}
