//! Records handed to audit, notification and portal read-model recorders.

use super::{DomainEvent, EntityType, EventType};
use crate::tenant::{MemberId, OrgId, TenantNamespace};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Immutable audit trail entry derived from a domain event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Tenant the entry belongs to.
    pub tenant: TenantNamespace,
    /// Audited entity kind.
    pub entity_type: EntityType,
    /// Audited entity identifier.
    pub entity_id: Uuid,
    /// Event type.
    pub event_type: EventType,
    /// Acting identity, `None` for system sweeps.
    pub actor_id: Option<Uuid>,
    /// Acting identity kind.
    pub actor_type: String,
    /// Structured details payload.
    pub details: Map<String, Value>,
    /// When the audited transition happened.
    pub occurred_at: DateTime<Utc>,
}

impl From<&DomainEvent> for AuditRecord {
    fn from(event: &DomainEvent) -> Self {
        Self {
            tenant: event.tenant().clone(),
            entity_type: event.entity_type(),
            entity_id: event.entity_id(),
            event_type: event.event_type(),
            actor_id: event.actor().actor_id(),
            actor_type: event.actor().actor_type().to_owned(),
            details: event.details().clone(),
            occurred_at: event.occurred_at(),
        }
    }
}

/// User-facing notification categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// A client accepted a proposal.
    ProposalAccepted,
    /// A client declined a proposal.
    ProposalDeclined,
    /// A proposal passed its deadline unanswered.
    ProposalExpired,
    /// A client accepted a document.
    DocumentAccepted,
    /// An acceptance request passed its deadline unanswered.
    AcceptanceExpired,
}

impl NotificationType {
    /// Maps an event type onto the notification it raises, if any.
    #[must_use]
    pub const fn for_event(event_type: EventType) -> Option<Self> {
        match event_type {
            EventType::ProposalAccepted => Some(Self::ProposalAccepted),
            EventType::ProposalDeclined => Some(Self::ProposalDeclined),
            EventType::ProposalExpired => Some(Self::ProposalExpired),
            EventType::AcceptanceAccepted => Some(Self::DocumentAccepted),
            EventType::AcceptanceExpired => Some(Self::AcceptanceExpired),
            _ => None,
        }
    }

    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProposalAccepted => "PROPOSAL_ACCEPTED",
            Self::ProposalDeclined => "PROPOSAL_DECLINED",
            Self::ProposalExpired => "PROPOSAL_EXPIRED",
            Self::DocumentAccepted => "DOCUMENT_ACCEPTED",
            Self::AcceptanceExpired => "ACCEPTANCE_EXPIRED",
        }
    }
}

/// Request to create a user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    /// Tenant the notification belongs to.
    pub tenant: TenantNamespace,
    /// Notification category.
    pub notification_type: NotificationType,
    /// Entity the notification links to.
    pub reference_entity_id: Uuid,
    /// Member receiving the notification.
    pub recipient: MemberId,
}

/// Denormalised row in the cross-tenant portal read-model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalRow {
    /// Projected entity kind.
    pub entity_type: EntityType,
    /// Projected entity identifier (row key).
    pub entity_id: Uuid,
    /// Tenant owning the entity.
    pub tenant: TenantNamespace,
    /// Organization owning the entity.
    pub org_id: OrgId,
    /// Current status.
    pub status: String,
    /// Display fields.
    pub fields: Map<String, Value>,
    /// When the row was last written.
    pub synced_at: DateTime<Utc>,
}
