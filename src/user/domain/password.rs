//! Password policy checks and the stored password digest.
//!
//! The policy mirrors the usual account-registration defaults: a minimum
//! length, no purely numeric passwords, no well-known passwords, and no
//! passwords that merely restate the username. Every failing rule is reported
//! so callers can render all problems at once.
//!
//! [`PasswordDigest`] is a salted SHA-256 placeholder. Credential storage and
//! login verification are owned by the identity provider in production
//! deployments, so the digest is only ever derived and stored here.

use super::{UserDomainError, Username};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Minimum accepted password length, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

const DIGEST_SCHEME: &str = "sha256";

const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "iloveyou",
    "sunshine",
    "princess",
    "football",
    "baseball",
    "welcome1",
    "admin123",
    "letmein1",
    "trustno1",
    "passw0rd",
    "superman",
    "abc12345",
];

/// A single password policy rule that a candidate password broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordViolation {
    /// Shorter than [`MIN_PASSWORD_LENGTH`].
    TooShort,
    /// Consists only of ASCII digits.
    EntirelyNumeric,
    /// Appears in the list of commonly used passwords.
    TooCommon,
    /// Contains, or is contained in, the username.
    TooSimilarToUsername,
}

impl fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(
                f,
                "password must contain at least {MIN_PASSWORD_LENGTH} characters"
            ),
            Self::EntirelyNumeric => write!(f, "password must not be entirely numeric"),
            Self::TooCommon => write!(f, "password is too common"),
            Self::TooSimilarToUsername => write!(f, "password is too similar to the username"),
        }
    }
}

/// Validates a candidate password for the given username.
///
/// # Errors
///
/// Returns [`UserDomainError::WeakPassword`] listing every violated rule.
pub fn validate_password(password: &str, username: &Username) -> Result<(), UserDomainError> {
    let violations = password_violations(password, username);
    if violations.is_empty() {
        return Ok(());
    }
    Err(UserDomainError::WeakPassword(violations))
}

fn password_violations(password: &str, username: &Username) -> Vec<PasswordViolation> {
    let mut violations = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        violations.push(PasswordViolation::TooShort);
    }
    if !password.is_empty() && password.chars().all(|ch| ch.is_ascii_digit()) {
        violations.push(PasswordViolation::EntirelyNumeric);
    }
    let lowered = password.trim().to_lowercase();
    if COMMON_PASSWORDS.contains(&lowered.as_str()) {
        violations.push(PasswordViolation::TooCommon);
    }
    if resembles_username(&lowered, username) {
        violations.push(PasswordViolation::TooSimilarToUsername);
    }
    violations
}

fn resembles_username(lowered_password: &str, username: &Username) -> bool {
    let lowered_username = username.as_str().to_lowercase();
    if lowered_username.chars().count() < 3 || lowered_password.is_empty() {
        return false;
    }
    lowered_password.contains(&lowered_username) || lowered_username.contains(lowered_password)
}

/// Salted password digest in `sha256$<salt>$<hex>` form.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Derives a digest for `password` with a fresh random salt.
    #[must_use]
    pub fn derive(password: &str) -> Self {
        Self::derive_with_salt(password, &Uuid::new_v4().simple().to_string())
    }

    fn derive_with_salt(password: &str, salt: &str) -> Self {
        Self(format!(
            "{DIGEST_SCHEME}${salt}${}",
            hash_hex(salt, password)
        ))
    }

    /// Restores a digest from its encoded storage form.
    ///
    /// # Errors
    ///
    /// Returns [`UserDomainError::MalformedPasswordDigest`] when the value is
    /// not a `sha256$<salt>$<hex>` triple.
    pub fn from_encoded(encoded: impl Into<String>) -> Result<Self, UserDomainError> {
        let value = encoded.into();
        if split_encoded(&value).is_none() {
            return Err(UserDomainError::MalformedPasswordDigest);
        }
        Ok(Self(value))
    }

    #[cfg(test)]
    pub(crate) fn matches(&self, candidate: &str) -> bool {
        split_encoded(&self.0)
            .is_some_and(|(salt, expected)| hash_hex(salt, candidate) == expected)
    }

    /// Returns the encoded storage form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

impl TryFrom<String> for PasswordDigest {
    type Error = UserDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_encoded(value)
    }
}

impl From<PasswordDigest> for String {
    fn from(value: PasswordDigest) -> Self {
        value.0
    }
}

fn split_encoded(encoded: &str) -> Option<(&str, &str)> {
    let mut parts = encoded.splitn(3, '$');
    let scheme = parts.next()?;
    let salt = parts.next()?;
    let hash = parts.next()?;
    let is_valid = scheme == DIGEST_SCHEME
        && !salt.is_empty()
        && hash.len() == 64
        && hash.chars().all(|ch| ch.is_ascii_hexdigit());
    is_valid.then_some((salt, hash))
}

fn hash_hex(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b"$");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}
