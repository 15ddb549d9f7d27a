//! The domain event envelope and its type vocabulary.

use crate::identifier::uuid_identifier;
use crate::tenant::{Actor, MemberId, OrgId, TenantContext, TenantNamespace};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

uuid_identifier! {
    /// Unique identifier of a published event.
    EventId
}

/// Kind of entity an event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A proposal.
    Proposal,
    /// An acceptance request.
    AcceptanceRequest,
    /// A customer.
    Customer,
}

impl EntityType {
    /// Returns the canonical audit representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::AcceptanceRequest => "acceptance_request",
            Self::Customer => "customer",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event type names. The string forms are a compatibility contract with
/// audit consumers and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// `proposal.created`
    #[serde(rename = "proposal.created")]
    ProposalCreated,
    /// `proposal.updated`
    #[serde(rename = "proposal.updated")]
    ProposalUpdated,
    /// `proposal.sent`
    #[serde(rename = "proposal.sent")]
    ProposalSent,
    /// `proposal.accepted`
    #[serde(rename = "proposal.accepted")]
    ProposalAccepted,
    /// `proposal.declined`
    #[serde(rename = "proposal.declined")]
    ProposalDeclined,
    /// `proposal.expired`
    #[serde(rename = "proposal.expired")]
    ProposalExpired,
    /// `proposal.deleted`
    #[serde(rename = "proposal.deleted")]
    ProposalDeleted,
    /// `acceptance.created`
    #[serde(rename = "acceptance.created")]
    AcceptanceCreated,
    /// `acceptance.sent`
    #[serde(rename = "acceptance.sent")]
    AcceptanceSent,
    /// `acceptance.viewed`
    #[serde(rename = "acceptance.viewed")]
    AcceptanceViewed,
    /// `acceptance.accepted`
    #[serde(rename = "acceptance.accepted")]
    AcceptanceAccepted,
    /// `acceptance.revoked`
    #[serde(rename = "acceptance.revoked")]
    AcceptanceRevoked,
    /// `acceptance.expired`
    #[serde(rename = "acceptance.expired")]
    AcceptanceExpired,
    /// `acceptance.reminded`
    #[serde(rename = "acceptance.reminded")]
    AcceptanceReminded,
    /// `acceptance.certificate_generated`
    #[serde(rename = "acceptance.certificate_generated")]
    AcceptanceCertificateGenerated,
    /// `customer.lifecycle_transitioned`
    #[serde(rename = "customer.lifecycle_transitioned")]
    CustomerLifecycleTransitioned,
}

impl EventType {
    /// Returns the canonical event type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProposalCreated => "proposal.created",
            Self::ProposalUpdated => "proposal.updated",
            Self::ProposalSent => "proposal.sent",
            Self::ProposalAccepted => "proposal.accepted",
            Self::ProposalDeclined => "proposal.declined",
            Self::ProposalExpired => "proposal.expired",
            Self::ProposalDeleted => "proposal.deleted",
            Self::AcceptanceCreated => "acceptance.created",
            Self::AcceptanceSent => "acceptance.sent",
            Self::AcceptanceViewed => "acceptance.viewed",
            Self::AcceptanceAccepted => "acceptance.accepted",
            Self::AcceptanceRevoked => "acceptance.revoked",
            Self::AcceptanceExpired => "acceptance.expired",
            Self::AcceptanceReminded => "acceptance.reminded",
            Self::AcceptanceCertificateGenerated => "acceptance.certificate_generated",
            Self::CustomerLifecycleTransitioned => "customer.lifecycle_transitioned",
        }
    }

    /// Returns the entity kind events of this type describe.
    #[must_use]
    pub const fn entity_type(self) -> EntityType {
        match self {
            Self::ProposalCreated
            | Self::ProposalUpdated
            | Self::ProposalSent
            | Self::ProposalAccepted
            | Self::ProposalDeclined
            | Self::ProposalExpired
            | Self::ProposalDeleted => EntityType::Proposal,
            Self::AcceptanceCreated
            | Self::AcceptanceSent
            | Self::AcceptanceViewed
            | Self::AcceptanceAccepted
            | Self::AcceptanceRevoked
            | Self::AcceptanceExpired
            | Self::AcceptanceReminded
            | Self::AcceptanceCertificateGenerated => EntityType::AcceptanceRequest,
            Self::CustomerLifecycleTransitioned => EntityType::Customer,
        }
    }

    /// Returns the status the entity holds after this event, for events
    /// that change a portal-visible status.
    #[must_use]
    pub const fn resulting_status(self) -> Option<&'static str> {
        match self {
            Self::ProposalSent | Self::AcceptanceSent => Some("SENT"),
            Self::ProposalAccepted | Self::AcceptanceAccepted => Some("ACCEPTED"),
            Self::ProposalDeclined => Some("DECLINED"),
            Self::ProposalExpired | Self::AcceptanceExpired => Some("EXPIRED"),
            Self::AcceptanceCreated => Some("PENDING"),
            Self::AcceptanceViewed => Some("VIEWED"),
            Self::AcceptanceRevoked => Some("REVOKED"),
            Self::ProposalCreated
            | Self::ProposalUpdated
            | Self::ProposalDeleted
            | Self::AcceptanceReminded
            | Self::AcceptanceCertificateGenerated
            | Self::CustomerLifecycleTransitioned => None,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed domain event emitted by one lifecycle transition.
///
/// `details` is the audit payload whose keys are part of the event contract.
/// `portal_fields` carries display data for the portal read-model and is
/// never written to the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    id: EventId,
    event_type: EventType,
    entity_id: Uuid,
    actor: Actor,
    tenant: TenantNamespace,
    org_id: OrgId,
    details: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    portal_fields: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recipient: Option<MemberId>,
    occurred_at: DateTime<Utc>,
}

impl DomainEvent {
    /// Creates an event attributed to the context's actor.
    #[must_use]
    pub fn new(
        ctx: &TenantContext,
        event_type: EventType,
        entity_id: Uuid,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type,
            entity_id,
            actor: ctx.actor(),
            tenant: ctx.namespace().clone(),
            org_id: ctx.org_id().clone(),
            details: Map::new(),
            portal_fields: Map::new(),
            recipient: None,
            occurred_at: clock.utc(),
        }
    }

    /// Adds an audit detail entry.
    #[must_use]
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_owned(), value.into());
        self
    }

    /// Adds a portal read-model field.
    #[must_use]
    pub fn with_portal_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.portal_fields.insert(key.to_owned(), value.into());
        self
    }

    /// Sets the member to notify about this event.
    #[must_use]
    pub const fn with_recipient(mut self, recipient: MemberId) -> Self {
        self.recipient = Some(recipient);
        self
    }

    /// Returns the event identifier.
    #[must_use]
    pub const fn id(&self) -> EventId {
        self.id
    }

    /// Returns the event type.
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Returns the entity kind.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.event_type.entity_type()
    }

    /// Returns the entity identifier.
    #[must_use]
    pub const fn entity_id(&self) -> Uuid {
        self.entity_id
    }

    /// Returns the acting identity.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        self.actor
    }

    /// Returns the tenant namespace.
    #[must_use]
    pub const fn tenant(&self) -> &TenantNamespace {
        &self.tenant
    }

    /// Returns the organization identifier.
    #[must_use]
    pub const fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    /// Returns the audit details payload.
    #[must_use]
    pub const fn details(&self) -> &Map<String, Value> {
        &self.details
    }

    /// Returns the portal read-model fields.
    #[must_use]
    pub const fn portal_fields(&self) -> &Map<String, Value> {
        &self.portal_fields
    }

    /// Returns the member to notify, if any.
    #[must_use]
    pub const fn recipient(&self) -> Option<MemberId> {
        self.recipient
    }

    /// Returns when the event occurred.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}
