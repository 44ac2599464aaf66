//! Shared wiring for `PostgreSQL` integration tests.

use std::sync::{Arc, Mutex, OnceLock};

use super::cluster::{handle_cluster_setup_failure, shared_cluster};
use diesel::{Connection, PgConnection};
use eyre::{Result, eyre};
use mockable::DefaultClock;
use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use rstest::fixture;
use taskdesk::config::TaskdeskSettings;
use taskdesk::persistence::{apply_schema, build_pool};
use taskdesk::task::{adapters::postgres::PostgresTaskRepository, services::TaskLifecycleService};
use taskdesk::user::{
    adapters::postgres::PostgresUserRepository,
    domain::{RoleFlags, User},
    services::{RegisterUserRequest, UserDirectoryService},
};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "taskdesk_test_template";

/// Connections per test database; enough for the claim race to overlap.
const POOL_SIZE: u32 = 4;

static TEMPLATE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// Task service backed by `PostgreSQL`.
pub type PgTaskService = TaskLifecycleService<PostgresTaskRepository, DefaultClock>;

/// Directory service backed by `PostgreSQL`.
pub type PgDirectory = UserDirectoryService<PostgresUserRepository, DefaultClock>;

/// Services and stores wired to a fresh database cloned from the template.
///
/// Field order matters: every pool is dropped before the database.
pub struct PostgresContext {
    /// Runtime driving the async stores from synchronous tests.
    pub runtime: Runtime,
    /// User directory.
    pub directory: PgDirectory,
    /// Task lifecycle service.
    pub tasks: Arc<PgTaskService>,
    /// Task store shared with `tasks`.
    pub task_store: Arc<PostgresTaskRepository>,
    /// User store shared with `directory`.
    pub user_store: Arc<PostgresUserRepository>,
    _database: TemporaryDatabase,
}

impl PostgresContext {
    /// Registers a user whose phone number is derived from `seq`.
    ///
    /// # Errors
    ///
    /// Returns an error when registration fails.
    pub fn register(&self, username: &str, seq: u16, roles: RoleFlags) -> Result<User> {
        let request = RegisterUserRequest::new(
            username,
            format!("+4470000{seq:05}"),
            "brass-lantern-42",
            roles,
        );
        Ok(self.runtime.block_on(self.directory.register(request))?)
    }
}

/// Creates the template database with the schema applied, once per cluster.
///
/// # Errors
///
/// Returns an error when the template cannot be created or migrated.
pub fn ensure_template(cluster: &ClusterHandle) -> Result<()> {
    let _lock = TEMPLATE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    let exists = cluster
        .database_exists(TEMPLATE_DB)
        .map_err(|err| eyre!("template check: {err:?}"))?;
    if exists {
        return Ok(());
    }

    cluster
        .create_database(TEMPLATE_DB)
        .map_err(|err| eyre!("create template: {err:?}"))?;
    let url = cluster.connection().database_url(TEMPLATE_DB);
    let mut connection = PgConnection::establish(&url)?;
    apply_schema(&mut connection)?;
    Ok(())
}

fn setup_context() -> Result<PostgresContext> {
    let cluster = shared_cluster()?;
    ensure_template(cluster)?;
    let database = cluster
        .temporary_database_from_template(format!("test_{}", Uuid::new_v4()), TEMPLATE_DB)
        .map_err(|err| eyre!("create database from template: {err:?}"))?;

    let settings = TaskdeskSettings {
        database_url: Some(database.url().to_owned()),
        pool_size: Some(POOL_SIZE),
        log_filter: None,
        json_logs: false,
    };
    let pool = build_pool(&settings)?;
    let user_store = Arc::new(PostgresUserRepository::new(pool.clone()));
    let task_store = Arc::new(PostgresTaskRepository::new(pool));
    let clock = Arc::new(DefaultClock);

    Ok(PostgresContext {
        runtime: Runtime::new()?,
        directory: UserDirectoryService::new(Arc::clone(&user_store), Arc::clone(&clock)),
        tasks: Arc::new(TaskLifecycleService::new(Arc::clone(&task_store), clock)),
        task_store,
        user_store,
        _database: database,
    })
}

/// Fresh database per test, or `None` when the cluster is skipped.
#[fixture]
pub fn postgres_context() -> Option<PostgresContext> {
    match setup_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
