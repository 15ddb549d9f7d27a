//! Service layer for drafting, sending, declining and deleting proposals.

use super::{ProposalServiceError, ProposalServiceResult, events, expiry::expire_overdue};
use crate::events::ports::EventPublisher;
use crate::persistence::{
    commit_and_publish,
    ports::{TenantStore, UnitOfWork},
};
use crate::practice::domain::{CustomerId, Money, ProjectTemplateId};
use crate::proposal::domain::{
    FeeModel, MilestoneDraft, NewProposal, Proposal, ProposalId, ProposalStatus, RetainerTerms,
    TeamMemberDraft,
};
use crate::tenant::{Actor, PortalContactId, TenantContext};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde_json::Value;
use std::sync::Arc;

/// Request payload for drafting a proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProposalRequest {
    title: String,
    customer_id: CustomerId,
    fee_model: FeeModel,
    fixed_fee: Option<Money>,
    retainer: Option<RetainerTerms>,
    content: Value,
    expires_at: Option<DateTime<Utc>>,
    project_template_id: Option<ProjectTemplateId>,
    milestones: Vec<MilestoneDraft>,
    team_members: Vec<TeamMemberDraft>,
}

impl CreateProposalRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, customer_id: CustomerId, fee_model: FeeModel) -> Self {
        Self {
            title: title.into(),
            customer_id,
            fee_model,
            fixed_fee: None,
            retainer: None,
            content: Value::Null,
            expires_at: None,
            project_template_id: None,
            milestones: Vec::new(),
            team_members: Vec::new(),
        }
    }

    /// Sets the fixed fee.
    #[must_use]
    pub fn with_fixed_fee(mut self, fee: Money) -> Self {
        self.fixed_fee = Some(fee);
        self
    }

    /// Sets the retainer terms.
    #[must_use]
    pub fn with_retainer(mut self, terms: RetainerTerms) -> Self {
        self.retainer = Some(terms);
        self
    }

    /// Sets the rich content.
    #[must_use]
    pub fn with_content(mut self, content: Value) -> Self {
        self.content = content;
        self
    }

    /// Sets the response deadline.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets the project template used on acceptance.
    #[must_use]
    pub const fn with_project_template(mut self, template_id: ProjectTemplateId) -> Self {
        self.project_template_id = Some(template_id);
        self
    }

    /// Sets the milestones.
    #[must_use]
    pub fn with_milestones(mut self, milestones: impl IntoIterator<Item = MilestoneDraft>) -> Self {
        self.milestones = milestones.into_iter().collect();
        self
    }

    /// Sets the proposed team.
    #[must_use]
    pub fn with_team_members(
        mut self,
        team_members: impl IntoIterator<Item = TeamMemberDraft>,
    ) -> Self {
        self.team_members = team_members.into_iter().collect();
        self
    }
}

/// Partial update of a draft proposal. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateProposalRequest {
    title: Option<String>,
    content: Option<Value>,
    expires_at: Option<Option<DateTime<Utc>>>,
    fixed_fee: Option<Option<Money>>,
    retainer: Option<Option<RetainerTerms>>,
    project_template_id: Option<Option<ProjectTemplateId>>,
}

impl UpdateProposalRequest {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the content.
    #[must_use]
    pub fn with_content(mut self, content: Value) -> Self {
        self.content = Some(content);
        self
    }

    /// Sets (`Some`) or clears (`None`) the deadline.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: Option<DateTime<Utc>>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets or clears the fixed fee.
    #[must_use]
    pub fn with_fixed_fee(mut self, fee: Option<Money>) -> Self {
        self.fixed_fee = Some(fee);
        self
    }

    /// Sets or clears the retainer terms.
    #[must_use]
    pub fn with_retainer(mut self, terms: Option<RetainerTerms>) -> Self {
        self.retainer = Some(terms);
        self
    }

    /// Sets or clears the project template.
    #[must_use]
    pub const fn with_project_template(mut self, template_id: Option<ProjectTemplateId>) -> Self {
        self.project_template_id = Some(template_id);
        self
    }
}

/// Proposal lifecycle service.
#[derive(Clone)]
pub struct ProposalService<S, P, C>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    publisher: Arc<P>,
    clock: Arc<C>,
}

impl<S, P, C> ProposalService<S, P, C>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a new proposal service.
    #[must_use]
    pub const fn new(store: Arc<S>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            publisher,
            clock,
        }
    }

    /// Drafts a proposal for a customer.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalServiceError`] when the actor is not a member, the
    /// customer or template is unknown, validation fails, or the store
    /// rejects the write.
    pub async fn create(
        &self,
        ctx: &TenantContext,
        request: CreateProposalRequest,
    ) -> ProposalServiceResult<Proposal> {
        let member_id = ctx.require_member()?;
        self.store
            .customer(ctx, request.customer_id)
            .await?
            .ok_or(ProposalServiceError::CustomerNotFound(request.customer_id))?;
        if let Some(template_id) = request.project_template_id {
            self.ensure_template(ctx, template_id).await?;
        }

        let clock = &*self.clock;
        let number = self.store.next_proposal_number(ctx).await?;
        let mut proposal = Proposal::new(
            number,
            NewProposal {
                title: request.title,
                customer_id: request.customer_id,
                fee_model: request.fee_model,
                fixed_fee: request.fixed_fee,
                retainer: request.retainer,
                content: request.content,
                expires_at: request.expires_at,
                project_template_id: request.project_template_id,
                created_by: member_id,
            },
            clock,
        )?;
        proposal.replace_milestones(request.milestones, clock)?;
        proposal.replace_team_members(request.team_members, clock)?;

        let mut unit = UnitOfWork::new();
        unit.insert_proposal(&proposal);
        unit.record_event(events::created(ctx, &proposal, clock));
        self.commit(ctx, unit).await?;
        Ok(proposal)
    }

    /// Applies a partial update to a draft.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalServiceError`] when the proposal is missing or no
    /// longer a draft, a referenced template is unknown, or validation
    /// fails.
    pub async fn update(
        &self,
        ctx: &TenantContext,
        id: ProposalId,
        request: UpdateProposalRequest,
    ) -> ProposalServiceResult<Proposal> {
        ctx.require_member()?;
        let mut proposal = self.load(ctx, id).await?;
        proposal.require_editable()?;
        if let Some(Some(template_id)) = request.project_template_id {
            self.ensure_template(ctx, template_id).await?;
        }

        let clock = &*self.clock;
        if let Some(title) = request.title {
            proposal.rename(title, clock)?;
        }
        if let Some(content) = request.content {
            proposal.replace_content(content, clock)?;
        }
        if let Some(expires_at) = request.expires_at {
            proposal.reschedule(expires_at, clock)?;
        }
        if let Some(fee) = request.fixed_fee {
            proposal.set_fixed_fee(fee, clock)?;
        }
        if let Some(terms) = request.retainer {
            proposal.set_retainer(terms, clock)?;
        }
        if let Some(template_id) = request.project_template_id {
            proposal.set_project_template(template_id, clock)?;
        }

        self.commit_update(ctx, proposal).await
    }

    /// Replaces the milestones of a draft.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalServiceError`] when the proposal is missing or no
    /// longer a draft, or the milestones are invalid for its fee model.
    pub async fn replace_milestones(
        &self,
        ctx: &TenantContext,
        id: ProposalId,
        milestones: Vec<MilestoneDraft>,
    ) -> ProposalServiceResult<Proposal> {
        ctx.require_member()?;
        let mut proposal = self.load(ctx, id).await?;
        proposal.replace_milestones(milestones, &*self.clock)?;
        self.commit_update(ctx, proposal).await
    }

    /// Replaces the proposed team of a draft.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalServiceError`] when the proposal is missing or no
    /// longer a draft, or a member is listed twice.
    pub async fn replace_team_members(
        &self,
        ctx: &TenantContext,
        id: ProposalId,
        team_members: Vec<TeamMemberDraft>,
    ) -> ProposalServiceResult<Proposal> {
        ctx.require_member()?;
        let mut proposal = self.load(ctx, id).await?;
        proposal.replace_team_members(team_members, &*self.clock)?;
        self.commit_update(ctx, proposal).await
    }

    /// Sends a draft to one of the customer's portal contacts.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalServiceError`] when the proposal or contact is
    /// missing, the contact belongs to another customer, the proposal is
    /// not a draft, or required fields are incomplete.
    pub async fn send(
        &self,
        ctx: &TenantContext,
        id: ProposalId,
        portal_contact_id: PortalContactId,
    ) -> ProposalServiceResult<Proposal> {
        ctx.require_member()?;
        let mut proposal = self.load(ctx, id).await?;
        let contact = self
            .store
            .portal_contact(ctx, portal_contact_id)
            .await?
            .ok_or(ProposalServiceError::PortalContactNotFound(portal_contact_id))?;
        if contact.customer_id() != proposal.customer_id() {
            return Err(ProposalServiceError::ContactCustomerMismatch {
                contact_id: portal_contact_id,
                customer_id: proposal.customer_id(),
            });
        }

        let clock = &*self.clock;
        proposal.mark_sent(portal_contact_id, clock)?;

        let mut unit = UnitOfWork::new();
        unit.update_proposal(&mut proposal);
        unit.record_event(events::sent(ctx, &proposal, clock));
        self.commit(ctx, unit).await?;
        Ok(proposal)
    }

    /// Records the customer's refusal.
    ///
    /// A portal caller only sees proposals sent to them. A proposal past
    /// its deadline is expired first and the decline is refused.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalServiceError::ProposalExpired`] after committing
    /// the expiry, [`ProposalServiceError::AlreadyDecided`] for terminal
    /// proposals, and an invalid transition for drafts.
    pub async fn decline(
        &self,
        ctx: &TenantContext,
        id: ProposalId,
        reason: Option<String>,
    ) -> ProposalServiceResult<Proposal> {
        let mut proposal = self.load(ctx, id).await?;
        let foreign_contact = matches!(
            ctx.actor(),
            Actor::PortalContact(contact_id) if proposal.portal_contact_id() != Some(contact_id)
        );
        if foreign_contact {
            return Err(ProposalServiceError::ProposalNotFound(id));
        }

        let clock = &*self.clock;
        if proposal.status() == ProposalStatus::Sent && proposal.is_past_deadline(clock.utc()) {
            return Err(expire_overdue(
                &*self.store,
                &*self.publisher,
                clock,
                ctx,
                proposal,
            )
            .await);
        }
        if proposal.is_terminal() {
            return Err(ProposalServiceError::AlreadyDecided {
                proposal_id: id,
                status: proposal.status(),
            });
        }
        proposal.mark_declined(reason, clock)?;

        let mut unit = UnitOfWork::new();
        unit.update_proposal(&mut proposal);
        unit.record_event(events::declined(ctx, &proposal, clock));
        self.commit(ctx, unit).await?;
        Ok(proposal)
    }

    /// Deletes a draft or sent proposal.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalServiceError`] when the proposal is missing or has
    /// reached a terminal status.
    pub async fn delete(&self, ctx: &TenantContext, id: ProposalId) -> ProposalServiceResult<()> {
        ctx.require_member()?;
        let proposal = self.load(ctx, id).await?;
        proposal.ensure_deletable()?;

        let mut unit = UnitOfWork::new();
        unit.delete_proposal(&proposal);
        unit.record_event(events::deleted(ctx, &proposal, &*self.clock));
        self.commit(ctx, unit).await?;
        Ok(())
    }

    /// Retrieves a proposal in the caller's tenant.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalServiceError::ProposalNotFound`] when absent.
    pub async fn find(
        &self,
        ctx: &TenantContext,
        id: ProposalId,
    ) -> ProposalServiceResult<Proposal> {
        self.load(ctx, id).await
    }

    async fn load(&self, ctx: &TenantContext, id: ProposalId) -> ProposalServiceResult<Proposal> {
        self.store
            .proposal(ctx, id)
            .await?
            .ok_or(ProposalServiceError::ProposalNotFound(id))
    }

    async fn ensure_template(
        &self,
        ctx: &TenantContext,
        template_id: ProjectTemplateId,
    ) -> ProposalServiceResult<()> {
        self.store
            .project_template(ctx, template_id)
            .await?
            .map(|_| ())
            .ok_or(ProposalServiceError::ProjectTemplateNotFound(template_id))
    }

    async fn commit_update(
        &self,
        ctx: &TenantContext,
        mut proposal: Proposal,
    ) -> ProposalServiceResult<Proposal> {
        let mut unit = UnitOfWork::new();
        unit.update_proposal(&mut proposal);
        unit.record_event(events::updated(ctx, &proposal, &*self.clock));
        self.commit(ctx, unit).await?;
        Ok(proposal)
    }

    async fn commit(&self, ctx: &TenantContext, unit: UnitOfWork) -> ProposalServiceResult<()> {
        commit_and_publish(&*self.store, &*self.publisher, ctx, unit).await?;
        Ok(())
    }
}
