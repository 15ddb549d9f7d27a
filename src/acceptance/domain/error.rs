//! Error types for acceptance request transitions.

use super::{AcceptanceRequestId, AcceptanceStatus};
use crate::error::ErrorKind;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned by acceptance request mutators and constructors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AcceptanceDomainError {
    /// The requested status transition is not permitted.
    #[error("acceptance request {request_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Request identifier.
        request_id: AcceptanceRequestId,
        /// Current status.
        from: AcceptanceStatus,
        /// Attempted status.
        to: AcceptanceStatus,
    },

    /// The deadline passed; the request has been moved to `EXPIRED`.
    #[error("acceptance request {request_id} expired at {expires_at}")]
    Expired {
        /// Request identifier.
        request_id: AcceptanceRequestId,
        /// Deadline that passed.
        expires_at: DateTime<Utc>,
    },

    /// Reminders are only sent for delivered, undecided requests.
    #[error("acceptance request {request_id} is {status} and cannot be reminded")]
    NotRemindable {
        /// Request identifier.
        request_id: AcceptanceRequestId,
        /// Current status.
        status: AcceptanceStatus,
    },

    /// The acceptor name is blank.
    #[error("acceptor name must not be empty")]
    EmptyAcceptorName,

    /// The deadline is not after the current time.
    #[error("acceptance request expiry must be in the future")]
    DeadlineNotInFuture,
}

impl AcceptanceDomainError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStateTransition { .. }
            | Self::Expired { .. }
            | Self::NotRemindable { .. } => ErrorKind::InvalidState,
            Self::EmptyAcceptorName | Self::DeadlineNotInFuture => ErrorKind::Validation,
        }
    }
}

/// Error returned while parsing acceptance statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown acceptance status: {0}")]
pub struct ParseAcceptanceStatusError(pub String);
