//! Shared `PostgreSQL` connection pool and schema bootstrap.

use crate::config::TaskdeskSettings;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tracing::info;

/// Connection pool used by every `PostgreSQL` adapter.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Schema for the `users` and `tasks` tables.
pub const SCHEMA_SQL: &str =
    include_str!("../migrations/2026-10-01-000000_create_users_and_tasks/up.sql");

/// Errors raised while preparing the database.
#[derive(Debug, Error)]
pub enum PersistenceSetupError {
    /// No database URL was configured.
    #[error("no database URL configured; set TASKDESK_DATABASE_URL")]
    MissingDatabaseUrl,

    /// The pool could not be built or a connection could not be checked out.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),

    /// Applying the schema failed.
    #[error("schema migration failed: {0}")]
    Migration(#[from] diesel::result::Error),
}

/// Builds a connection pool from settings.
///
/// # Errors
///
/// Returns [`PersistenceSetupError::MissingDatabaseUrl`] when no URL is set
/// and [`PersistenceSetupError::Pool`] when the pool cannot connect.
pub fn build_pool(settings: &TaskdeskSettings) -> Result<PgPool, PersistenceSetupError> {
    let url = settings
        .database_url()
        .ok_or(PersistenceSetupError::MissingDatabaseUrl)?;
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(settings.pool_size())
        .build(manager)?;
    info!(pool_size = settings.pool_size(), "database pool ready");
    Ok(pool)
}

/// Applies [`SCHEMA_SQL`]. Safe to run repeatedly.
///
/// # Errors
///
/// Returns [`PersistenceSetupError::Migration`] when a statement fails.
pub fn apply_schema(connection: &mut PgConnection) -> Result<(), PersistenceSetupError> {
    connection.batch_execute(SCHEMA_SQL)?;
    info!("database schema applied");
    Ok(())
}
