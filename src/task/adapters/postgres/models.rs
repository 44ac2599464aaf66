//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Owning customer.
    pub customer_id: uuid::Uuid,
    /// Assigned employee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Free-text report.
    pub report: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// Compare-and-swap revision.
    pub revision: i64,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Owning customer.
    pub customer_id: uuid::Uuid,
    /// Assigned employee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Free-text report.
    pub report: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// Compare-and-swap revision.
    pub revision: i64,
}

/// Changeset applied by a compare-and-swap update.
///
/// `treat_none_as_null` makes a cleared report or assignee overwrite the
/// stored value.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = tasks)]
#[diesel(treat_none_as_null = true)]
pub struct TaskChangeset {
    /// Assigned employee.
    pub assignee_id: Option<uuid::Uuid>,
    /// Lifecycle status.
    pub status: String,
    /// Free-text report.
    pub report: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Completion timestamp.
    pub closed_at: Option<DateTime<Utc>>,
    /// New revision.
    pub revision: i64,
}
