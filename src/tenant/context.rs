//! The read-only tenant scope of one logical operation.

use super::{MemberId, OrgId, PortalContactId, TenantNamespace};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised while building or interrogating a tenant context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TenantContextError {
    /// The namespace does not follow the `tenant_<suffix>` convention.
    #[error("invalid tenant namespace '{0}'")]
    InvalidNamespace(String),

    /// The organization identifier is blank.
    #[error("organization id must not be empty")]
    EmptyOrgId,

    /// The operation requires an organization member as actor.
    #[error("operation requires a member actor, got {actor_type}")]
    MemberRequired {
        /// Actor type present on the context.
        actor_type: &'static str,
    },
}

/// Identity on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Actor {
    /// An organization member using the application.
    Member(MemberId),
    /// A customer contact using the client portal.
    PortalContact(PortalContactId),
    /// A scheduled job with no initiating identity.
    System,
}

impl Actor {
    /// Returns the audit actor type.
    #[must_use]
    pub const fn actor_type(self) -> &'static str {
        match self {
            Self::Member(_) => "MEMBER",
            Self::PortalContact(_) => "PORTAL_CONTACT",
            Self::System => "SYSTEM",
        }
    }

    /// Returns the actor's identifier, or `None` for system actors.
    #[must_use]
    pub const fn actor_id(self) -> Option<Uuid> {
        match self {
            Self::Member(id) => Some(id.into_inner()),
            Self::PortalContact(id) => Some(id.into_inner()),
            Self::System => None,
        }
    }

    /// Returns the member identifier when the actor is a member.
    #[must_use]
    pub const fn member_id(self) -> Option<MemberId> {
        match self {
            Self::Member(id) => Some(id),
            Self::PortalContact(_) | Self::System => None,
        }
    }
}

/// Tenant scope for one logical operation.
///
/// # Examples
///
/// ```
/// use covenant::tenant::{MemberId, OrgId, TenantContext, TenantNamespace};
///
/// let ctx = TenantContext::member(
///     TenantNamespace::new("tenant_acme")?,
///     OrgId::new("org_acme")?,
///     MemberId::new(),
/// );
/// assert!(ctx.require_member().is_ok());
/// # Ok::<(), covenant::tenant::TenantContextError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    namespace: TenantNamespace,
    org_id: OrgId,
    actor: Actor,
}

impl TenantContext {
    /// Builds a context for an organization member.
    #[must_use]
    pub const fn member(namespace: TenantNamespace, org_id: OrgId, member_id: MemberId) -> Self {
        Self {
            namespace,
            org_id,
            actor: Actor::Member(member_id),
        }
    }

    /// Builds a context for a portal contact.
    #[must_use]
    pub const fn portal(
        namespace: TenantNamespace,
        org_id: OrgId,
        contact_id: PortalContactId,
    ) -> Self {
        Self {
            namespace,
            org_id,
            actor: Actor::PortalContact(contact_id),
        }
    }

    /// Builds a context for scheduled, actor-less work.
    #[must_use]
    pub const fn system(namespace: TenantNamespace, org_id: OrgId) -> Self {
        Self {
            namespace,
            org_id,
            actor: Actor::System,
        }
    }

    /// Returns the same tenant scope with the system as actor.
    #[must_use]
    pub fn as_system(&self) -> Self {
        Self::system(self.namespace.clone(), self.org_id.clone())
    }

    /// Returns the tenant namespace.
    #[must_use]
    pub const fn namespace(&self) -> &TenantNamespace {
        &self.namespace
    }

    /// Returns the organization identifier.
    #[must_use]
    pub const fn org_id(&self) -> &OrgId {
        &self.org_id
    }

    /// Returns the acting identity.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        self.actor
    }

    /// Returns the acting member.
    ///
    /// # Errors
    ///
    /// Returns [`TenantContextError::MemberRequired`] when the actor is a
    /// portal contact or the system.
    pub const fn require_member(&self) -> Result<MemberId, TenantContextError> {
        match self.actor {
            Actor::Member(id) => Ok(id),
            Actor::PortalContact(_) | Actor::System => Err(TenantContextError::MemberRequired {
                actor_type: self.actor.actor_type(),
            }),
        }
    }
}
