//! Service-level errors for acceptance operations.

use crate::acceptance::domain::{AcceptanceDomainError, AcceptanceRequestId};
use crate::error::ErrorKind;
use crate::persistence::ports::StoreError;
use crate::practice::domain::{CustomerId, DocumentId};
use crate::tenant::{PortalContactId, TenantContextError};
use thiserror::Error;

/// Errors returned by acceptance services.
#[derive(Debug, Error)]
pub enum AcceptanceServiceError {
    /// Request validation or transition failed.
    #[error(transparent)]
    Domain(#[from] AcceptanceDomainError),

    /// The tenant context cannot perform the operation.
    #[error(transparent)]
    Context(#[from] TenantContextError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request does not exist in the caller's tenant.
    #[error("acceptance request not found: {0}")]
    RequestNotFound(AcceptanceRequestId),

    /// No request in the caller's tenant carries the presented token.
    #[error("no acceptance request matches the presented token")]
    TokenNotFound,

    /// The document does not exist in the caller's tenant.
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// The portal contact does not exist in the caller's tenant.
    #[error("portal contact not found: {0}")]
    ContactNotFound(PortalContactId),

    /// The portal contact belongs to a different customer than the document.
    #[error("portal contact {contact_id} does not belong to customer {customer_id}")]
    ContactCustomerMismatch {
        /// Portal contact.
        contact_id: PortalContactId,
        /// Document customer.
        customer_id: CustomerId,
    },
}

impl AcceptanceServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Context(_) | Self::ContactCustomerMismatch { .. } => ErrorKind::Validation,
            Self::Store(err) => err.kind(),
            Self::RequestNotFound(_)
            | Self::TokenNotFound
            | Self::DocumentNotFound(_)
            | Self::ContactNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for acceptance service operations.
pub type AcceptanceServiceResult<T> = Result<T, AcceptanceServiceError>;

/// Rejected acceptance settings.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AcceptanceSettingsError {
    /// The default deadline is zero or unreasonably far away.
    #[error("acceptance.default_expiry_days must be in range 1..={max}, got {days}")]
    ExpiryDaysOutOfRange {
        /// Rejected value.
        days: u32,
        /// Largest permitted value.
        max: u32,
    },

    /// Generated tokens would be too short to resist guessing or too long
    /// for a link.
    #[error("acceptance.token_length must be in range {min}..={max}, got {length}")]
    TokenLengthOutOfRange {
        /// Rejected value.
        length: usize,
        /// Smallest permitted value.
        min: usize,
        /// Largest permitted value.
        max: usize,
    },
}
