//! Port through which accepted requests obtain their certificate.

use super::{RenderError, StorageError};
use crate::acceptance::domain::{AcceptanceRequest, AcceptanceRequestId, AcceptanceStatus};
use crate::error::ErrorKind;
use crate::persistence::ports::StoreError;
use crate::practice::domain::DocumentId;
use crate::tenant::{PortalContactId, TenantContext};
use async_trait::async_trait;
use thiserror::Error;

/// Issues the certificate of acceptance for an accepted request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificateIssuer: Send + Sync {
    /// Generates, stores and records the certificate, returning the
    /// committed request.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError`] when any step fails; the request is
    /// left without a certificate.
    async fn issue(
        &self,
        ctx: &TenantContext,
        request: &AcceptanceRequest,
    ) -> Result<AcceptanceRequest, CertificateError>;
}

/// Errors raised while issuing a certificate.
#[derive(Debug, Error)]
pub enum CertificateError {
    /// Certificates exist only for accepted requests.
    #[error("acceptance request {request_id} is {status}, not ACCEPTED")]
    NotAccepted {
        /// Request identifier.
        request_id: AcceptanceRequestId,
        /// Current status.
        status: AcceptanceStatus,
    },

    /// The accepted document is missing.
    #[error("document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// The accepting contact is missing.
    #[error("portal contact not found: {0}")]
    ContactNotFound(PortalContactId),

    /// Reading the document or writing the certificate failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Rendering or PDF conversion failed.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Recording the certificate failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CertificateError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotAccepted { .. } => ErrorKind::InvalidState,
            Self::DocumentNotFound(_) | Self::ContactNotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) | Self::Render(_) => ErrorKind::Internal,
            Self::Store(err) => err.kind(),
        }
    }
}
