//! Builders for acceptance request domain events.

use crate::acceptance::domain::AcceptanceRequest;
use crate::events::domain::{DomainEvent, EventType};
use crate::practice::domain::{GeneratedDocument, PortalContact};
use crate::tenant::{MemberId, TenantContext};
use mockable::Clock;

fn base(
    ctx: &TenantContext,
    event_type: EventType,
    request: &AcceptanceRequest,
    clock: &impl Clock,
) -> DomainEvent {
    DomainEvent::new(ctx, event_type, request.id().into_inner(), clock)
}

/// Adds the fields the portal read model displays for a request.
fn with_portal_fields(event: DomainEvent, request: &AcceptanceRequest) -> DomainEvent {
    event
        .with_portal_field("request_token", request.token().as_str())
        .with_portal_field("document_id", request.document_id().to_string())
        .with_portal_field("customer_id", request.customer_id().to_string())
        .with_portal_field("portal_contact_id", request.portal_contact_id().to_string())
        .with_portal_field("expires_at", request.expires_at().to_rfc3339())
}

pub(super) fn created(
    ctx: &TenantContext,
    request: &AcceptanceRequest,
    document: &GeneratedDocument,
    contact: &PortalContact,
    clock: &impl Clock,
) -> DomainEvent {
    let event = base(ctx, EventType::AcceptanceCreated, request, clock)
        .with_detail("document_file_name", document.file_name())
        .with_detail("contact_name", contact.display_name())
        .with_detail("contact_email", contact.email());
    with_portal_fields(event, request).with_portal_field("document_file_name", document.file_name())
}

pub(super) fn sent(
    ctx: &TenantContext,
    request: &AcceptanceRequest,
    document: &GeneratedDocument,
    contact: &PortalContact,
    clock: &impl Clock,
) -> DomainEvent {
    let event = base(ctx, EventType::AcceptanceSent, request, clock)
        .with_detail("document_file_name", document.file_name())
        .with_detail("contact_name", contact.display_name())
        .with_detail("contact_email", contact.email());
    with_portal_fields(event, request).with_portal_field("document_file_name", document.file_name())
}

pub(super) fn viewed(
    ctx: &TenantContext,
    request: &AcceptanceRequest,
    document: &GeneratedDocument,
    contact: &PortalContact,
    clock: &impl Clock,
) -> DomainEvent {
    let event = base(ctx, EventType::AcceptanceViewed, request, clock)
        .with_detail("document_file_name", document.file_name())
        .with_detail("contact_name", contact.display_name());
    with_portal_fields(event, request)
}

pub(super) fn accepted(
    ctx: &TenantContext,
    request: &AcceptanceRequest,
    clock: &impl Clock,
) -> DomainEvent {
    let acceptor_name = request
        .acceptor()
        .map(|acceptor| acceptor.acceptor_name.clone());
    let event = base(ctx, EventType::AcceptanceAccepted, request, clock)
        .with_detail("acceptor_name", acceptor_name.clone())
        .with_recipient(request.sent_by());
    with_portal_fields(event, request).with_portal_field("acceptor_name", acceptor_name)
}

pub(super) fn revoked(
    ctx: &TenantContext,
    request: &AcceptanceRequest,
    revoked_by: MemberId,
    clock: &impl Clock,
) -> DomainEvent {
    let event = base(ctx, EventType::AcceptanceRevoked, request, clock)
        .with_detail("revoked_by", revoked_by.to_string());
    with_portal_fields(event, request)
}

pub(super) fn reminded(
    ctx: &TenantContext,
    request: &AcceptanceRequest,
    reminder_count: u32,
    clock: &impl Clock,
) -> DomainEvent {
    base(ctx, EventType::AcceptanceReminded, request, clock)
        .with_detail("reminder_count", reminder_count)
}

/// Expiry is always attributed to the system, whoever's call noticed it.
pub(super) fn expired(
    ctx: &TenantContext,
    request: &AcceptanceRequest,
    clock: &impl Clock,
) -> DomainEvent {
    let event = base(&ctx.as_system(), EventType::AcceptanceExpired, request, clock)
        .with_recipient(request.sent_by());
    with_portal_fields(event, request)
}

pub(super) fn certificate_generated(
    ctx: &TenantContext,
    request: &AcceptanceRequest,
    certificate_file_name: &str,
    document_hash: &str,
    clock: &impl Clock,
) -> DomainEvent {
    base(ctx, EventType::AcceptanceCertificateGenerated, request, clock)
        .with_detail("certificate_file_name", certificate_file_name)
        .with_detail("document_hash", document_hash)
}
