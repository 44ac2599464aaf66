//! `PostgreSQL` repository implementation for the user directory.

use super::{
    models::{NewUserRow, UserRow},
    schema::users,
};
use crate::persistence::PgPool;
use crate::user::{
    domain::{
        EmailAddress, PasswordDigest, PersistedUserData, PhoneNumber, RoleFlags, User, UserId,
        Username,
    },
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(UserRepositoryError::persistence)?
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let user_id = user.id();
        let username = user.username().clone();
        let phone = user.phone().clone();
        let new_row = to_new_row(user);

        self.run_blocking(move |connection| {
            diesel::insert_into(users::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
                        match violated_constraint(info.as_ref()) {
                            Some(USERNAME_CONSTRAINT) => {
                                UserRepositoryError::DuplicateUsername(username.clone())
                            }
                            Some(PHONE_CONSTRAINT) => {
                                UserRepositoryError::DuplicatePhone(phone.clone())
                            }
                            _ => UserRepositoryError::DuplicateUser(user_id),
                        }
                    }
                    _ => UserRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::id.eq(id.into_inner()))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_username(&self, username: &Username) -> UserRepositoryResult<Option<User>> {
        let name = username.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::username.eq(&name))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list_all(&self) -> UserRepositoryResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let rows = users::table
                .order((users::joined_at.asc(), users::id.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }
}

const USERNAME_CONSTRAINT: &str = "users_username_unique";
const PHONE_CONSTRAINT: &str = "users_phone_unique";

fn violated_constraint(info: &dyn DatabaseErrorInformation) -> Option<&str> {
    info.constraint_name()
}

fn to_new_row(user: &User) -> NewUserRow {
    NewUserRow {
        id: user.id().into_inner(),
        username: user.username().as_str().to_owned(),
        phone: user.phone().as_str().to_owned(),
        email: user.email().map(|email| email.as_str().to_owned()),
        is_customer: user.is_customer(),
        is_employee: user.is_employee(),
        password_digest: user.password_digest().as_str().to_owned(),
        joined_at: user.joined_at(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        username: persisted_username,
        phone: persisted_phone,
        email: persisted_email,
        is_customer,
        is_employee,
        password_digest: persisted_digest,
        joined_at,
    } = row;

    let username = Username::new(persisted_username).map_err(UserRepositoryError::persistence)?;
    let phone = PhoneNumber::new(persisted_phone).map_err(UserRepositoryError::persistence)?;
    let email = persisted_email
        .map(EmailAddress::new)
        .transpose()
        .map_err(UserRepositoryError::persistence)?;
    let password_digest =
        PasswordDigest::from_encoded(persisted_digest).map_err(UserRepositoryError::persistence)?;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(id),
        username,
        phone,
        email,
        roles: RoleFlags::new(is_customer, is_employee),
        password_digest,
        joined_at,
    }))
}
