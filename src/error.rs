//! Error taxonomy shared by every service-level error in the crate.
//!
//! Each bounded context keeps its own `thiserror` enums; callers that need to
//! map failures onto a transport (HTTP status codes, portal responses) ask
//! the error for its [`ErrorKind`] instead of matching every variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The referenced entity is absent or outside the caller's tenant.
    NotFound,
    /// The entity's current status does not permit the operation.
    InvalidState,
    /// A uniqueness or concurrency rule rejected the operation.
    Conflict,
    /// Input failed validation for the entity's configuration.
    Validation,
    /// Persistence or collaborator failure unrelated to the request.
    Internal,
}

impl ErrorKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
