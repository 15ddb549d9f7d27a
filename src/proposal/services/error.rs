//! Service-level errors for proposal operations.

use crate::error::ErrorKind;
use crate::persistence::ports::StoreError;
use crate::practice::domain::{CustomerId, PracticeDomainError, ProjectTemplateId};
use crate::proposal::domain::{ProposalDomainError, ProposalId, ProposalStatus};
use crate::tenant::{PortalContactId, TenantContextError};
use thiserror::Error;

/// Errors returned by proposal services.
#[derive(Debug, Error)]
pub enum ProposalServiceError {
    /// Proposal validation or transition failed.
    #[error(transparent)]
    Domain(#[from] ProposalDomainError),

    /// Project or invoice construction failed.
    #[error(transparent)]
    Practice(#[from] PracticeDomainError),

    /// The tenant context cannot perform the operation.
    #[error(transparent)]
    Context(#[from] TenantContextError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The proposal does not exist in the caller's tenant.
    #[error("proposal not found: {0}")]
    ProposalNotFound(ProposalId),

    /// The customer does not exist in the caller's tenant.
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// The portal contact does not exist in the caller's tenant.
    #[error("portal contact not found: {0}")]
    PortalContactNotFound(PortalContactId),

    /// The project template does not exist in the caller's tenant.
    #[error("project template not found: {0}")]
    ProjectTemplateNotFound(ProjectTemplateId),

    /// The portal contact belongs to a different customer.
    #[error("portal contact {contact_id} does not belong to customer {customer_id}")]
    ContactCustomerMismatch {
        /// Portal contact.
        contact_id: PortalContactId,
        /// Proposal customer.
        customer_id: CustomerId,
    },

    /// The customer already decided on the proposal.
    #[error("proposal {proposal_id} is already {status}")]
    AlreadyDecided {
        /// Proposal identifier.
        proposal_id: ProposalId,
        /// Terminal status.
        status: ProposalStatus,
    },

    /// The deadline passed; the proposal has been expired.
    #[error("proposal {0} has expired")]
    ProposalExpired(ProposalId),
}

impl ProposalServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Practice(_) | Self::Context(_) | Self::ContactCustomerMismatch { .. } => {
                ErrorKind::Validation
            }
            Self::Store(err) => err.kind(),
            Self::ProposalNotFound(_)
            | Self::CustomerNotFound(_)
            | Self::PortalContactNotFound(_)
            | Self::ProjectTemplateNotFound(_) => ErrorKind::NotFound,
            Self::AlreadyDecided { .. } | Self::ProposalExpired(_) => ErrorKind::Conflict,
        }
    }
}

/// Result type for proposal service operations.
pub type ProposalServiceResult<T> = Result<T, ProposalServiceError>;
