//! Domain model for the user directory.
//!
//! Users carry two independent role flags and a unique contact number. The
//! task lifecycle consumes users for authorization decisions only.

mod error;
mod ids;
mod password;
mod user;

pub use error::UserDomainError;
pub use ids::UserId;
pub use password::{MIN_PASSWORD_LENGTH, PasswordDigest, PasswordViolation, validate_password};
pub use user::{
    EmailAddress, PersistedUserData, PhoneNumber, RoleFlags, User, UserRegistration, Username,
};
