//! Error types for user directory validation.

use super::PasswordViolation;
use thiserror::Error;

/// Errors returned while constructing user directory values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserDomainError {
    /// The username is empty after trimming.
    #[error("username must not be empty")]
    EmptyUsername,

    /// The username exceeds the 150-character storage limit.
    #[error("username exceeds 150 character limit: {0}")]
    UsernameTooLong(String),

    /// The username contains characters outside letters, digits and `@.+-_`.
    #[error("username '{0}' may only contain letters, digits and @ . + - _")]
    InvalidUsername(String),

    /// The phone number is empty after trimming.
    #[error("phone number must not be empty")]
    EmptyPhoneNumber,

    /// The phone number is longer than 15 characters.
    #[error("phone number '{0}' exceeds 15 characters")]
    PhoneNumberTooLong(String),

    /// The e-mail address is malformed.
    #[error("invalid e-mail address '{0}'")]
    InvalidEmail(String),

    /// The password fails one or more policy rules.
    #[error("password rejected: {}", describe_violations(.0))]
    WeakPassword(Vec<PasswordViolation>),

    /// A persisted password digest could not be decoded.
    #[error("malformed password digest")]
    MalformedPasswordDigest,
}

fn describe_violations(violations: &[PasswordViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
