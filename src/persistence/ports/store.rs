//! Store port for tenant-scoped reads and atomic commits.

use super::UnitOfWork;
use crate::acceptance::domain::{AcceptanceRequest, AcceptanceRequestId, RequestToken};
use crate::error::ErrorKind;
use crate::practice::domain::{
    Customer, CustomerId, DocumentId, GeneratedDocument, Invoice, PortalContact, Project,
    ProjectId, ProjectTemplate, ProjectTemplateId,
};
use crate::proposal::domain::{Proposal, ProposalId, ProposalNumber};
use crate::tenant::{PortalContactId, TenantContext};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Tenant-scoped persistence contract.
///
/// Lookups return `None` for entities that do not exist in the caller's
/// namespace, whether or not another tenant holds them.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Allocates the next proposal number for the tenant. Numbers are
    /// never reused; a failed creation leaves a gap.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persistence`] when the sequence cannot advance.
    async fn next_proposal_number(&self, ctx: &TenantContext) -> StoreResult<ProposalNumber>;

    /// Finds a proposal by identifier.
    async fn proposal(
        &self,
        ctx: &TenantContext,
        id: ProposalId,
    ) -> StoreResult<Option<Proposal>>;

    /// Returns `SENT` proposals whose deadline is strictly before `now`.
    async fn proposals_expired_before(
        &self,
        ctx: &TenantContext,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<Proposal>>;

    /// Finds an acceptance request by identifier.
    async fn acceptance_request(
        &self,
        ctx: &TenantContext,
        id: AcceptanceRequestId,
    ) -> StoreResult<Option<AcceptanceRequest>>;

    /// Finds an acceptance request by its portal token.
    async fn acceptance_request_by_token(
        &self,
        ctx: &TenantContext,
        token: &RequestToken,
    ) -> StoreResult<Option<AcceptanceRequest>>;

    /// Finds the active request for a document and contact, if any.
    async fn active_acceptance_request(
        &self,
        ctx: &TenantContext,
        document_id: DocumentId,
        portal_contact_id: PortalContactId,
    ) -> StoreResult<Option<AcceptanceRequest>>;

    /// Returns active acceptance requests whose deadline is strictly before
    /// `now`.
    async fn acceptance_requests_expired_before(
        &self,
        ctx: &TenantContext,
        now: DateTime<Utc>,
    ) -> StoreResult<Vec<AcceptanceRequest>>;

    /// Finds a customer.
    async fn customer(
        &self,
        ctx: &TenantContext,
        id: CustomerId,
    ) -> StoreResult<Option<Customer>>;

    /// Finds a portal contact.
    async fn portal_contact(
        &self,
        ctx: &TenantContext,
        id: PortalContactId,
    ) -> StoreResult<Option<PortalContact>>;

    /// Finds a generated document.
    async fn generated_document(
        &self,
        ctx: &TenantContext,
        id: DocumentId,
    ) -> StoreResult<Option<GeneratedDocument>>;

    /// Finds a project template.
    async fn project_template(
        &self,
        ctx: &TenantContext,
        id: ProjectTemplateId,
    ) -> StoreResult<Option<ProjectTemplate>>;

    /// Finds a project.
    async fn project(&self, ctx: &TenantContext, id: ProjectId) -> StoreResult<Option<Project>>;

    /// Returns the invoices raised for a project, in creation order.
    async fn invoices_for_project(
        &self,
        ctx: &TenantContext,
        project_id: ProjectId,
    ) -> StoreResult<Vec<Invoice>>;

    /// Applies every staged write and appends the staged events to the
    /// tenant outbox, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::StaleRevision`] when an update was based on an
    /// outdated revision, [`StoreError::UniqueViolation`] when the result
    /// would break a uniqueness constraint, and
    /// [`StoreError::DuplicateEntity`] or [`StoreError::NotFound`] for
    /// inserts of existing rows or updates of missing ones. Nothing is
    /// applied when an error is returned.
    async fn commit(&self, ctx: &TenantContext, unit: UnitOfWork) -> StoreResult<()>;
}

/// Errors returned by store implementations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// An update or delete targeted a missing row.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind.
        entity: &'static str,
        /// Entity identifier.
        id: Uuid,
    },

    /// An insert targeted an existing row.
    #[error("duplicate {entity}: {id}")]
    DuplicateEntity {
        /// Entity kind.
        entity: &'static str,
        /// Entity identifier.
        id: Uuid,
    },

    /// The write would break a uniqueness constraint.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Constraint name.
        constraint: &'static str,
    },

    /// The row changed since it was loaded.
    #[error("{entity} {id} was modified concurrently (expected revision {expected}, found {actual})")]
    StaleRevision {
        /// Entity kind.
        entity: &'static str,
        /// Entity identifier.
        id: Uuid,
        /// Revision the write was based on.
        expected: u64,
        /// Revision currently stored.
        actual: u64,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateEntity { .. }
            | Self::UniqueViolation { .. }
            | Self::StaleRevision { .. } => ErrorKind::Conflict,
            Self::Persistence(_) => ErrorKind::Internal,
        }
    }
}
