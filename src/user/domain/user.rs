//! User aggregate and its validated scalar fields.

use super::{PasswordDigest, UserDomainError, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique display name used to identify a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    const MAX_LENGTH: usize = 150;

    /// Creates a validated username.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyUsername`] when the trimmed value is
    /// empty, [`UserDomainError::UsernameTooLong`] beyond 150 characters, and
    /// [`UserDomainError::InvalidUsername`] for characters outside letters,
    /// digits and `@ . + - _`.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyUsername);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(UserDomainError::UsernameTooLong(raw));
        }
        let has_valid_chars = trimmed
            .chars()
            .all(|ch| ch.is_alphanumeric() || matches!(ch, '@' | '.' | '+' | '-' | '_'));
        if !has_valid_chars {
            return Err(UserDomainError::InvalidUsername(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the username as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique contact phone number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    const MAX_LENGTH: usize = 15;

    /// Creates a validated phone number.
    ///
    /// Any contact string is accepted; only blank and overlong values are
    /// refused.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::EmptyPhoneNumber`] for blank input and
    /// [`UserDomainError::PhoneNumberTooLong`] when the trimmed value exceeds
    /// 15 characters.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserDomainError::EmptyPhoneNumber);
        }
        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(UserDomainError::PhoneNumberTooLong(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the phone number as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = UserDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional e-mail address supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated e-mail address.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::InvalidEmail`] unless the value has exactly
    /// one `@`, a non-empty local part, and a dotted domain.
    pub fn new(value: impl Into<String>) -> Result<Self, UserDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        let mut parts = trimmed.split('@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let is_valid = !local.is_empty()
            && parts.next().is_none()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !trimmed.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(UserDomainError::InvalidEmail(raw));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Independent role flags carried by every user.
///
/// A user may hold both roles or neither; the flags never constrain each
/// other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RoleFlags {
    /// Whether the user may create tasks.
    pub is_customer: bool,
    /// Whether the user may claim tasks.
    pub is_employee: bool,
}

impl RoleFlags {
    /// Creates role flags from the two independent booleans.
    #[must_use]
    pub const fn new(is_customer: bool, is_employee: bool) -> Self {
        Self {
            is_customer,
            is_employee,
        }
    }

    /// Flags for a user who only creates tasks.
    #[must_use]
    pub const fn customer() -> Self {
        Self::new(true, false)
    }

    /// Flags for a user who only works on tasks.
    #[must_use]
    pub const fn employee() -> Self {
        Self::new(false, true)
    }
}

/// Validated fields for a new user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRegistration {
    /// Unique username.
    pub username: Username,
    /// Unique contact phone number.
    pub phone: PhoneNumber,
    /// Optional e-mail address.
    pub email: Option<EmailAddress>,
    /// Role flags fixed at registration.
    pub roles: RoleFlags,
    /// Digest of the accepted password.
    pub password_digest: PasswordDigest,
}

/// Parameter object for reconstructing a persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedUserData {
    /// Persisted user identifier.
    pub id: UserId,
    /// Persisted username.
    pub username: Username,
    /// Persisted phone number.
    pub phone: PhoneNumber,
    /// Persisted e-mail address, if any.
    pub email: Option<EmailAddress>,
    /// Persisted role flags.
    pub roles: RoleFlags,
    /// Persisted password digest.
    pub password_digest: PasswordDigest,
    /// Persisted registration timestamp.
    pub joined_at: DateTime<Utc>,
}

/// Registered user identity.
///
/// Serializes without the password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: UserId,
    username: Username,
    phone: PhoneNumber,
    email: Option<EmailAddress>,
    roles: RoleFlags,
    #[serde(skip_serializing)]
    password_digest: PasswordDigest,
    joined_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user from validated registration fields.
    #[must_use]
    pub fn register(registration: UserRegistration, clock: &impl Clock) -> Self {
        Self {
            id: UserId::new(),
            username: registration.username,
            phone: registration.phone,
            email: registration.email,
            roles: registration.roles,
            password_digest: registration.password_digest,
            joined_at: clock.utc(),
        }
    }

    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedUserData) -> Self {
        Self {
            id: data.id,
            username: data.username,
            phone: data.phone,
            email: data.email,
            roles: data.roles,
            password_digest: data.password_digest,
            joined_at: data.joined_at,
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username.
    #[must_use]
    pub const fn username(&self) -> &Username {
        &self.username
    }

    /// Returns the contact phone number.
    #[must_use]
    pub const fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    /// Returns the e-mail address, if any.
    #[must_use]
    pub const fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    /// Returns the role flags.
    #[must_use]
    pub const fn roles(&self) -> RoleFlags {
        self.roles
    }

    /// Returns whether the user holds the customer role.
    #[must_use]
    pub const fn is_customer(&self) -> bool {
        self.roles.is_customer
    }

    /// Returns whether the user holds the employee role.
    #[must_use]
    pub const fn is_employee(&self) -> bool {
        self.roles.is_employee
    }

    /// Returns the stored password digest.
    #[must_use]
    pub const fn password_digest(&self) -> &PasswordDigest {
        &self.password_digest
    }

    /// Returns the registration timestamp.
    #[must_use]
    pub const fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.username)
    }
}
