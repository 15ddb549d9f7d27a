//! Service layer for sending, viewing, accepting, revoking and reminding
//! acceptance requests.

use super::{
    AcceptanceServiceError, AcceptanceServiceResult, AcceptanceSettingsError, events,
    expiry::commit_expiry,
};
use crate::acceptance::domain::{
    AcceptanceDomainError, AcceptanceRequest, AcceptanceRequestId, AcceptanceStatus,
    AcceptanceSubmission, NewAcceptanceRequest, RequestToken,
};
use crate::acceptance::ports::CertificateIssuer;
use crate::events::ports::EventPublisher;
use crate::persistence::{
    commit_and_publish,
    ports::{TenantStore, UnitOfWork},
};
use crate::practice::domain::{DocumentId, GeneratedDocument, PortalContact};
use crate::tenant::{PortalContactId, TenantContext};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::warn;

/// Tunables applied when creating requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptanceSettings {
    default_expiry_days: u32,
    token_length: usize,
}

impl AcceptanceSettings {
    /// Longest default deadline, in days.
    pub const MAX_EXPIRY_DAYS: u32 = 3650;
    /// Shortest generated token.
    pub const MIN_TOKEN_LENGTH: usize = 32;
    /// Longest generated token.
    pub const MAX_TOKEN_LENGTH: usize = 128;

    /// Creates settings from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceSettingsError`] when the default deadline is not
    /// in `1..=MAX_EXPIRY_DAYS` or the token length is not in
    /// `MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH`.
    pub const fn new(
        default_expiry_days: u32,
        token_length: usize,
    ) -> Result<Self, AcceptanceSettingsError> {
        if default_expiry_days == 0 || default_expiry_days > Self::MAX_EXPIRY_DAYS {
            return Err(AcceptanceSettingsError::ExpiryDaysOutOfRange {
                days: default_expiry_days,
                max: Self::MAX_EXPIRY_DAYS,
            });
        }
        if token_length < Self::MIN_TOKEN_LENGTH || token_length > Self::MAX_TOKEN_LENGTH {
            return Err(AcceptanceSettingsError::TokenLengthOutOfRange {
                length: token_length,
                min: Self::MIN_TOKEN_LENGTH,
                max: Self::MAX_TOKEN_LENGTH,
            });
        }
        Ok(Self {
            default_expiry_days,
            token_length,
        })
    }

    /// Returns the deadline applied when none is provided, in days.
    #[must_use]
    pub const fn default_expiry_days(&self) -> u32 {
        self.default_expiry_days
    }

    /// Returns the generated token length.
    #[must_use]
    pub const fn token_length(&self) -> usize {
        self.token_length
    }
}

impl Default for AcceptanceSettings {
    fn default() -> Self {
        Self {
            default_expiry_days: 30,
            token_length: RequestToken::DEFAULT_LENGTH,
        }
    }
}

/// Request payload for sending a document for acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateAcceptanceRequest {
    document_id: DocumentId,
    portal_contact_id: PortalContactId,
    expires_at: Option<DateTime<Utc>>,
}

impl CreateAcceptanceRequest {
    /// Creates a request using the default deadline.
    #[must_use]
    pub const fn new(document_id: DocumentId, portal_contact_id: PortalContactId) -> Self {
        Self {
            document_id,
            portal_contact_id,
            expires_at: None,
        }
    }

    /// Sets an explicit deadline.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// Acceptance request lifecycle service.
#[derive(Clone)]
pub struct AcceptanceService<S, P, C, G>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
    G: CertificateIssuer,
{
    store: Arc<S>,
    publisher: Arc<P>,
    clock: Arc<C>,
    issuer: Arc<G>,
    settings: AcceptanceSettings,
}

impl<S, P, C, G> AcceptanceService<S, P, C, G>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
    G: CertificateIssuer,
{
    /// Creates a new acceptance service with default settings.
    #[must_use]
    pub fn new(store: Arc<S>, publisher: Arc<P>, clock: Arc<C>, issuer: Arc<G>) -> Self {
        Self {
            store,
            publisher,
            clock,
            issuer,
            settings: AcceptanceSettings::default(),
        }
    }

    /// Replaces the creation settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: AcceptanceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sends a document to a portal contact for acceptance.
    ///
    /// Any active request for the same document and contact is revoked in
    /// the same commit, so at most one stays active per pair.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceServiceError::Context`] when the actor is not a
    /// member, `DocumentNotFound`/`ContactNotFound` for unknown references,
    /// [`AcceptanceServiceError::ContactCustomerMismatch`] when the contact
    /// belongs to another customer, a domain error for a past deadline, or
    /// a store conflict when a concurrent send won the race.
    pub async fn create_and_send(
        &self,
        ctx: &TenantContext,
        request: CreateAcceptanceRequest,
    ) -> AcceptanceServiceResult<AcceptanceRequest> {
        let sender = ctx.require_member()?;
        let clock = &*self.clock;
        let document = self.load_document(ctx, request.document_id).await?;
        let contact = self.load_contact(ctx, request.portal_contact_id).await?;
        if contact.customer_id() != document.customer_id() {
            return Err(AcceptanceServiceError::ContactCustomerMismatch {
                contact_id: contact.id(),
                customer_id: document.customer_id(),
            });
        }

        let expires_at = request.expires_at.unwrap_or_else(|| {
            clock.utc() + Duration::days(i64::from(self.settings.default_expiry_days))
        });
        let mut unit = UnitOfWork::new();

        let existing = self
            .store
            .active_acceptance_request(ctx, document.id(), contact.id())
            .await?;
        if let Some(mut sibling) = existing {
            sibling.mark_revoked(sender, clock)?;
            unit.update_acceptance_request(&mut sibling);
            unit.record_event(events::revoked(ctx, &sibling, sender, clock));
        }

        let mut created = AcceptanceRequest::new(
            NewAcceptanceRequest {
                document_id: document.id(),
                portal_contact_id: contact.id(),
                customer_id: document.customer_id(),
                token: RequestToken::generate(self.settings.token_length),
                expires_at,
                sent_by: sender,
            },
            clock,
        )?;
        unit.record_event(events::created(ctx, &created, &document, &contact, clock));
        created.mark_sent(clock)?;
        unit.record_event(events::sent(ctx, &created, &document, &contact, clock));
        unit.insert_acceptance_request(&created);

        commit_and_publish(&*self.store, &*self.publisher, ctx, unit).await?;
        Ok(created)
    }

    /// Records that the contact opened the request.
    ///
    /// Only the first view is recorded; later views and views of an
    /// accepted request return the request unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceServiceError::TokenNotFound`] for an unknown
    /// token, or an `InvalidState` domain error when the request is revoked,
    /// expired, or found past its deadline (the expiry is committed first).
    pub async fn mark_viewed(
        &self,
        ctx: &TenantContext,
        token: &RequestToken,
    ) -> AcceptanceServiceResult<AcceptanceRequest> {
        let clock = &*self.clock;
        let mut request = self.load_by_token(ctx, token).await?;
        if request.status() == AcceptanceStatus::Accepted {
            return Ok(request);
        }

        let first_view = match request.mark_viewed(clock) {
            Ok(changed) => changed,
            Err(err @ AcceptanceDomainError::Expired { .. }) => {
                return Err(self.settle_expired(ctx, request, err).await);
            }
            Err(err) => return Err(err.into()),
        };
        if !first_view {
            return Ok(request);
        }

        let document = self.load_document(ctx, request.document_id()).await?;
        let contact = self.load_contact(ctx, request.portal_contact_id()).await?;
        let mut unit = UnitOfWork::new();
        unit.update_acceptance_request(&mut request);
        unit.record_event(events::viewed(ctx, &request, &document, &contact, clock));
        commit_and_publish(&*self.store, &*self.publisher, ctx, unit).await?;
        Ok(request)
    }

    /// Accepts the request on behalf of the contact.
    ///
    /// Repeating an acceptance returns the accepted request without
    /// publishing anything. After the acceptance commits, a certificate is
    /// issued; a failure there is logged and the acceptance stands.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceServiceError::TokenNotFound`] for an unknown
    /// token, an `InvalidState` domain error for revoked or expired requests
    /// (a request found past its deadline is expired and committed first),
    /// or a `Validation` domain error for a blank acceptor name.
    pub async fn accept(
        &self,
        ctx: &TenantContext,
        token: &RequestToken,
        submission: AcceptanceSubmission,
    ) -> AcceptanceServiceResult<AcceptanceRequest> {
        let clock = &*self.clock;
        let mut request = self.load_by_token(ctx, token).await?;

        let newly_accepted = match request.mark_accepted(submission, clock) {
            Ok(changed) => changed,
            Err(err @ AcceptanceDomainError::Expired { .. }) => {
                return Err(self.settle_expired(ctx, request, err).await);
            }
            Err(err) => return Err(err.into()),
        };
        if !newly_accepted {
            return Ok(request);
        }

        let mut unit = UnitOfWork::new();
        unit.update_acceptance_request(&mut request);
        unit.record_event(events::accepted(ctx, &request, clock));
        commit_and_publish(&*self.store, &*self.publisher, ctx, unit).await?;

        Ok(self.issue_certificate(ctx, request).await)
    }

    /// Revokes an active request.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceServiceError::Context`] when the actor is not a
    /// member, [`AcceptanceServiceError::RequestNotFound`], or an
    /// `InvalidState` domain error for a terminal request.
    pub async fn revoke(
        &self,
        ctx: &TenantContext,
        id: AcceptanceRequestId,
    ) -> AcceptanceServiceResult<AcceptanceRequest> {
        let member = ctx.require_member()?;
        let clock = &*self.clock;
        let mut request = self.load(ctx, id).await?;
        request.mark_revoked(member, clock)?;

        let mut unit = UnitOfWork::new();
        unit.update_acceptance_request(&mut request);
        unit.record_event(events::revoked(ctx, &request, member, clock));
        commit_and_publish(&*self.store, &*self.publisher, ctx, unit).await?;
        Ok(request)
    }

    /// Counts a reminder sent to the contact.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceServiceError::Context`] when the actor is not a
    /// member, [`AcceptanceServiceError::RequestNotFound`], or an
    /// `InvalidState` domain error unless the request is `SENT` or `VIEWED`.
    pub async fn remind(
        &self,
        ctx: &TenantContext,
        id: AcceptanceRequestId,
    ) -> AcceptanceServiceResult<AcceptanceRequest> {
        ctx.require_member()?;
        let clock = &*self.clock;
        let mut request = self.load(ctx, id).await?;
        let reminder_count = request.record_reminder(clock)?;

        let mut unit = UnitOfWork::new();
        unit.update_acceptance_request(&mut request);
        unit.record_event(events::reminded(ctx, &request, reminder_count, clock));
        commit_and_publish(&*self.store, &*self.publisher, ctx, unit).await?;
        Ok(request)
    }

    /// Looks up a request by its portal token.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceServiceError::TokenNotFound`] when no request in
    /// the caller's tenant carries the token.
    pub async fn find_by_token(
        &self,
        ctx: &TenantContext,
        token: &RequestToken,
    ) -> AcceptanceServiceResult<AcceptanceRequest> {
        self.load_by_token(ctx, token).await
    }

    /// Looks up a request by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceServiceError::RequestNotFound`] when the request
    /// does not exist in the caller's tenant.
    pub async fn find(
        &self,
        ctx: &TenantContext,
        id: AcceptanceRequestId,
    ) -> AcceptanceServiceResult<AcceptanceRequest> {
        self.load(ctx, id).await
    }

    async fn settle_expired(
        &self,
        ctx: &TenantContext,
        mut request: AcceptanceRequest,
        reason: AcceptanceDomainError,
    ) -> AcceptanceServiceError {
        match commit_expiry(
            &*self.store,
            &*self.publisher,
            &*self.clock,
            ctx,
            &mut request,
        )
        .await
        {
            Ok(()) => reason.into(),
            Err(err) => err,
        }
    }

    async fn issue_certificate(
        &self,
        ctx: &TenantContext,
        request: AcceptanceRequest,
    ) -> AcceptanceRequest {
        match self.issuer.issue(ctx, &request).await {
            Ok(certified) => certified,
            Err(error) => {
                warn!(
                    tenant = %ctx.namespace(),
                    request_id = %request.id(),
                    error = %error,
                    "failed to generate acceptance certificate"
                );
                request
            }
        }
    }

    async fn load(
        &self,
        ctx: &TenantContext,
        id: AcceptanceRequestId,
    ) -> AcceptanceServiceResult<AcceptanceRequest> {
        self.store
            .acceptance_request(ctx, id)
            .await?
            .ok_or(AcceptanceServiceError::RequestNotFound(id))
    }

    async fn load_by_token(
        &self,
        ctx: &TenantContext,
        token: &RequestToken,
    ) -> AcceptanceServiceResult<AcceptanceRequest> {
        self.store
            .acceptance_request_by_token(ctx, token)
            .await?
            .ok_or(AcceptanceServiceError::TokenNotFound)
    }

    async fn load_document(
        &self,
        ctx: &TenantContext,
        id: DocumentId,
    ) -> AcceptanceServiceResult<GeneratedDocument> {
        self.store
            .generated_document(ctx, id)
            .await?
            .ok_or(AcceptanceServiceError::DocumentNotFound(id))
    }

    async fn load_contact(
        &self,
        ctx: &TenantContext,
        id: PortalContactId,
    ) -> AcceptanceServiceResult<PortalContact> {
        self.store
            .portal_contact(ctx, id)
            .await?
            .ok_or(AcceptanceServiceError::ContactNotFound(id))
    }
}
