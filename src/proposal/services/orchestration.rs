//! Acceptance orchestration: one unit of work that turns a won proposal
//! into a project, draft invoices and team assignments.

use super::{ProposalServiceError, ProposalServiceResult, events, expiry::expire_overdue};
use crate::events::ports::EventPublisher;
use crate::persistence::{
    commit_and_publish,
    ports::{TenantStore, UnitOfWork},
};
use crate::practice::domain::{
    Invoice, InvoiceId, InvoiceLine, NewInvoice, NewProject, Project, ProjectId,
};
use crate::proposal::domain::{Proposal, ProposalId, ProposalStatus};
use crate::tenant::{MemberId, PortalContactId, TenantContext};
use mockable::Clock;
use std::sync::Arc;

/// What acceptance provisioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalAcceptanceOutcome {
    /// Accepted proposal.
    pub proposal_id: ProposalId,
    /// Project created for the engagement.
    pub project_id: ProjectId,
    /// Draft invoices created, in milestone order.
    pub invoice_ids: Vec<InvoiceId>,
    /// Team members assigned to the project besides its lead.
    pub assigned_member_ids: Vec<MemberId>,
}

/// Orchestrates proposal acceptance.
///
/// Everything is staged in memory and committed once; nothing outside the
/// tenant store is called inside that boundary.
#[derive(Clone)]
pub struct ProposalOrchestrator<S, P, C>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    publisher: Arc<P>,
    clock: Arc<C>,
}

impl<S, P, C> ProposalOrchestrator<S, P, C>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a new orchestrator.
    #[must_use]
    pub const fn new(store: Arc<S>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            publisher,
            clock,
        }
    }

    /// Accepts a sent proposal on behalf of its portal contact.
    ///
    /// # Errors
    ///
    /// - [`ProposalServiceError::ProposalNotFound`] when the proposal is
    ///   absent or was sent to a different contact.
    /// - [`ProposalServiceError::ProposalExpired`] after committing the
    ///   expiry when the deadline has passed.
    /// - [`ProposalServiceError::AlreadyDecided`] for terminal proposals.
    /// - An invalid transition for drafts.
    /// - A not-found error when the customer or designated template is
    ///   missing; nothing is written in that case.
    pub async fn accept_proposal(
        &self,
        ctx: &TenantContext,
        proposal_id: ProposalId,
        portal_contact_id: PortalContactId,
    ) -> ProposalServiceResult<ProposalAcceptanceOutcome> {
        let mut proposal = self
            .store
            .proposal(ctx, proposal_id)
            .await?
            .ok_or(ProposalServiceError::ProposalNotFound(proposal_id))?;
        if proposal
            .portal_contact_id()
            .is_some_and(|contact_id| contact_id != portal_contact_id)
        {
            return Err(ProposalServiceError::ProposalNotFound(proposal_id));
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
                proposal_id,
                status: proposal.status(),
            });
        }
        proposal.mark_accepted(clock)?;

        let mut customer = self
            .store
            .customer(ctx, proposal.customer_id())
            .await?
            .ok_or(ProposalServiceError::CustomerNotFound(proposal.customer_id()))?;
        let mut project = self.provision_project(ctx, &proposal, customer.name()).await?;
        proposal.link_project(project.id());

        let invoices = raise_invoices(&mut proposal, project.id(), clock)?;
        let mut assigned_member_ids = Vec::new();
        for member in proposal.team_members() {
            if project.assign_member(member.member_id()) {
                assigned_member_ids.push(member.member_id());
            }
        }

        let mut unit = UnitOfWork::new();
        unit.update_proposal(&mut proposal);
        unit.insert_project(&project);
        for invoice in &invoices {
            unit.insert_invoice(invoice);
        }
        unit.record_event(events::accepted(
            ctx,
            &proposal,
            project.id(),
            invoices.len(),
            clock,
        ));
        if let Some(transition) = customer.begin_onboarding(clock) {
            unit.update_customer(&mut customer);
            unit.record_event(events::lifecycle_transitioned(
                ctx,
                customer.id(),
                transition,
                clock,
            ));
        }

        commit_and_publish(&*self.store, &*self.publisher, ctx, unit).await?;
        Ok(ProposalAcceptanceOutcome {
            proposal_id,
            project_id: project.id(),
            invoice_ids: invoices.iter().map(Invoice::id).collect(),
            assigned_member_ids,
        })
    }

    async fn provision_project(
        &self,
        ctx: &TenantContext,
        proposal: &Proposal,
        customer_name: &str,
    ) -> ProposalServiceResult<Project> {
        let params = |name: String| NewProject {
            name,
            customer_id: proposal.customer_id(),
            created_by: proposal.created_by(),
            proposal_id: Some(proposal.id().into_inner()),
        };

        let Some(template_id) = proposal.project_template_id() else {
            return Ok(Project::new(params(proposal.title().to_owned()), &*self.clock)?);
        };
        let template = self
            .store
            .project_template(ctx, template_id)
            .await?
            .ok_or(ProposalServiceError::ProjectTemplateNotFound(template_id))?;
        let name = template.resolve_name(customer_name, proposal.title());
        Ok(Project::from_template(&template, params(name), &*self.clock)?)
    }
}

/// Creates one draft invoice per installment and links milestones to them.
fn raise_invoices(
    proposal: &mut Proposal,
    project_id: ProjectId,
    clock: &impl Clock,
) -> ProposalServiceResult<Vec<Invoice>> {
    let mut invoices = Vec::new();
    for installment in proposal.invoice_installments()? {
        let invoice = Invoice::draft(
            NewInvoice {
                customer_id: proposal.customer_id(),
                project_id,
                proposal_id: Some(proposal.id().into_inner()),
                currency: installment.amount.currency().clone(),
                lines: vec![InvoiceLine::manual(
                    installment.description,
                    installment.amount.amount(),
                )],
                created_by: proposal.created_by(),
            },
            clock,
        )?;
        if let Some(milestone_id) = installment.milestone_id {
            proposal.link_milestone_invoice(milestone_id, invoice.id());
        }
        invoices.push(invoice);
    }
    Ok(invoices)
}
