//! Caller-facing failure taxonomy shared by every service.
//!
//! Each service error reports exactly one [`FailureKind`] so transports can
//! choose a response without matching on nested error types.

use serde::Serialize;
use std::fmt;

/// Distinct category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Input was malformed or missing.
    Validation,
    /// The requester is authenticated but not allowed to act on the resource.
    Forbidden,
    /// The referenced resource does not exist.
    NotFound,
    /// The resource changed underneath the request, or was already taken.
    Conflict,
    /// The request context does not resolve to a known user.
    Unauthenticated,
    /// Infrastructure failure unrelated to the request itself.
    Internal,
}

impl FailureKind {
    /// Returns the canonical snake-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Unauthenticated => "unauthenticated",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
