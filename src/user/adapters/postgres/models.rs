//! Diesel row models for user persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique username.
    pub username: String,
    /// Unique contact phone number.
    pub phone: String,
    /// Optional e-mail address.
    pub email: Option<String>,
    /// Customer role flag.
    pub is_customer: bool,
    /// Employee role flag.
    pub is_employee: bool,
    /// Encoded password digest.
    pub password_digest: String,
    /// Registration timestamp.
    pub joined_at: DateTime<Utc>,
}

/// Insert model for user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct NewUserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Unique username.
    pub username: String,
    /// Unique contact phone number.
    pub phone: String,
    /// Optional e-mail address.
    pub email: Option<String>,
    /// Customer role flag.
    pub is_customer: bool,
    /// Employee role flag.
    pub is_employee: bool,
    /// Encoded password digest.
    pub password_digest: String,
    /// Registration timestamp.
    pub joined_at: DateTime<Utc>,
}
