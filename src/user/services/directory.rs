//! Service layer for registration and user lookup.

use crate::failure::FailureKind;
use crate::user::{
    domain::{
        EmailAddress, PasswordDigest, PhoneNumber, RoleFlags, User, UserDomainError, UserId,
        UserRegistration, Username, validate_password,
    },
    ports::{UserRepository, UserRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for registering a new user.
#[derive(Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    username: String,
    phone: String,
    password: String,
    email: Option<String>,
    roles: RoleFlags,
}

impl RegisterUserRequest {
    /// Creates a request with the required registration fields.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        phone: impl Into<String>,
        password: impl Into<String>,
        roles: RoleFlags,
    ) -> Self {
        Self {
            username: username.into(),
            phone: phone.into(),
            password: password.into(),
            email: None,
            roles,
        }
    }

    /// Sets the e-mail address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl std::fmt::Debug for RegisterUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterUserRequest")
            .field("username", &self.username)
            .field("phone", &self.phone)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .finish_non_exhaustive()
    }
}

/// Authenticated identity resolved by the transport for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    user_id: UserId,
}

impl RequestContext {
    /// Creates a context for an authenticated user.
    #[must_use]
    pub const fn authenticated(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Returns the authenticated user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Service-level errors for user directory operations.
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// Registration input failed validation.
    #[error(transparent)]
    Domain(#[from] UserDomainError),

    /// The request context refers to no registered user.
    #[error("no registered user for authenticated identity {0}")]
    Unauthenticated(UserId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] UserRepositoryError),
}

impl UserDirectoryError {
    /// Returns the caller-facing failure category.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::Domain(_)
            | Self::Repository(
                UserRepositoryError::DuplicateUsername(_) | UserRepositoryError::DuplicatePhone(_),
            ) => FailureKind::Validation,
            Self::Unauthenticated(_) => FailureKind::Unauthenticated,
            Self::Repository(
                UserRepositoryError::DuplicateUser(_) | UserRepositoryError::Persistence(_),
            ) => FailureKind::Internal,
        }
    }
}

/// Result type for user directory operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// User directory orchestration service.
#[derive(Clone)]
pub struct UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> UserDirectoryService<R, C>
where
    R: UserRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Domain`] when a field or the password
    /// policy rejects the input, and [`UserDirectoryError::Repository`] when
    /// the username or phone number is already registered or storage fails.
    pub async fn register(&self, request: RegisterUserRequest) -> UserDirectoryResult<User> {
        let username = Username::new(request.username)?;
        let phone = PhoneNumber::new(request.phone)?;
        let email = request.email.map(EmailAddress::new).transpose()?;
        if let Err(err) = validate_password(&request.password, &username) {
            debug!(username = %username, error = %err, "registration rejected by password policy");
            return Err(err.into());
        }

        let user = User::register(
            UserRegistration {
                username,
                phone,
                email,
                roles: request.roles,
                password_digest: PasswordDigest::derive(&request.password),
            },
            &*self.clock,
        );
        self.repository.store(&user).await?;
        info!(
            user_id = %user.id(),
            username = %user.username(),
            is_customer = user.is_customer(),
            is_employee = user.is_employee(),
            "user registered"
        );
        Ok(user)
    }

    /// Retrieves a user by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, id: UserId) -> UserDirectoryResult<Option<User>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Retrieves a user by username, as a login flow would.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Domain`] when `username` is malformed and
    /// [`UserDirectoryError::Repository`] when lookup fails.
    pub async fn find_by_username(&self, username: &str) -> UserDirectoryResult<Option<User>> {
        let parsed = Username::new(username)?;
        Ok(self.repository.find_by_username(&parsed).await?)
    }

    /// Lists every registered user.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Repository`] when lookup fails.
    pub async fn list_users(&self) -> UserDirectoryResult<Vec<User>> {
        Ok(self.repository.list_all().await?)
    }

    /// Resolves the user behind an authenticated request.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Unauthenticated`] when the identity no
    /// longer maps to a registered user.
    pub async fn current_user(&self, context: &RequestContext) -> UserDirectoryResult<User> {
        self.repository
            .find_by_id(context.user_id())
            .await?
            .ok_or(UserDirectoryError::Unauthenticated(context.user_id()))
    }
}
