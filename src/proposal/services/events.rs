//! Builders for proposal domain events.

use crate::events::domain::{DomainEvent, EventType};
use crate::practice::domain::{CustomerId, LifecycleTransition, ProjectId};
use crate::proposal::domain::Proposal;
use crate::tenant::TenantContext;
use mockable::Clock;

fn base(
    ctx: &TenantContext,
    event_type: EventType,
    proposal: &Proposal,
    clock: &impl Clock,
) -> DomainEvent {
    DomainEvent::new(ctx, event_type, proposal.id().into_inner(), clock)
}

/// Adds the fields the portal read model displays for a proposal.
fn with_portal_fields(event: DomainEvent, proposal: &Proposal) -> DomainEvent {
    event
        .with_portal_field("title", proposal.title())
        .with_portal_field("proposal_number", proposal.number().to_string())
        .with_portal_field("fee_model", proposal.fee_model().as_str())
        .with_portal_field("customer_id", proposal.customer_id().to_string())
        .with_portal_field(
            "portal_contact_id",
            proposal.portal_contact_id().map(|id| id.to_string()),
        )
        .with_portal_field(
            "expires_at",
            proposal.expires_at().map(|deadline| deadline.to_rfc3339()),
        )
}

pub(super) fn created(ctx: &TenantContext, proposal: &Proposal, clock: &impl Clock) -> DomainEvent {
    base(ctx, EventType::ProposalCreated, proposal, clock)
        .with_detail("title", proposal.title())
        .with_detail("fee_model", proposal.fee_model().as_str())
        .with_detail("customer_id", proposal.customer_id().to_string())
}

pub(super) fn updated(ctx: &TenantContext, proposal: &Proposal, clock: &impl Clock) -> DomainEvent {
    base(ctx, EventType::ProposalUpdated, proposal, clock).with_detail("title", proposal.title())
}

pub(super) fn sent(ctx: &TenantContext, proposal: &Proposal, clock: &impl Clock) -> DomainEvent {
    let event = base(ctx, EventType::ProposalSent, proposal, clock)
        .with_detail("proposal_number", proposal.number().to_string())
        .with_detail("customer_id", proposal.customer_id().to_string())
        .with_detail(
            "portal_contact_id",
            proposal.portal_contact_id().map(|id| id.to_string()),
        );
    with_portal_fields(event, proposal)
}

pub(super) fn accepted(
    ctx: &TenantContext,
    proposal: &Proposal,
    project_id: ProjectId,
    invoice_count: usize,
    clock: &impl Clock,
) -> DomainEvent {
    let event = base(ctx, EventType::ProposalAccepted, proposal, clock)
        .with_detail("proposal_number", proposal.number().to_string())
        .with_detail("customer_id", proposal.customer_id().to_string())
        .with_detail("project_id", project_id.to_string())
        .with_detail("invoice_count", invoice_count)
        .with_recipient(proposal.created_by());
    with_portal_fields(event, proposal)
}

pub(super) fn declined(
    ctx: &TenantContext,
    proposal: &Proposal,
    clock: &impl Clock,
) -> DomainEvent {
    let event = base(ctx, EventType::ProposalDeclined, proposal, clock)
        .with_detail("proposal_number", proposal.number().to_string())
        .with_detail("customer_id", proposal.customer_id().to_string())
        .with_detail("reason", proposal.decline_reason())
        .with_recipient(proposal.created_by());
    with_portal_fields(event, proposal)
}

/// Expiry is always attributed to the system, whoever's call noticed it.
pub(super) fn expired(ctx: &TenantContext, proposal: &Proposal, clock: &impl Clock) -> DomainEvent {
    let event = base(&ctx.as_system(), EventType::ProposalExpired, proposal, clock)
        .with_detail("proposal_number", proposal.number().to_string())
        .with_detail("customer_id", proposal.customer_id().to_string())
        .with_recipient(proposal.created_by());
    with_portal_fields(event, proposal)
}

pub(super) fn deleted(ctx: &TenantContext, proposal: &Proposal, clock: &impl Clock) -> DomainEvent {
    base(ctx, EventType::ProposalDeleted, proposal, clock)
        .with_detail("proposal_number", proposal.number().to_string())
        .with_detail("title", proposal.title())
}

pub(super) fn lifecycle_transitioned(
    ctx: &TenantContext,
    customer_id: CustomerId,
    transition: LifecycleTransition,
    clock: &impl Clock,
) -> DomainEvent {
    DomainEvent::new(
        ctx,
        EventType::CustomerLifecycleTransitioned,
        customer_id.into_inner(),
        clock,
    )
    .with_detail("from", transition.from.as_str())
    .with_detail("to", transition.to.as_str())
}
