//! Tenant context carried through every core operation.
//!
//! A [`TenantContext`] names the storage namespace, the organization and the
//! acting identity for one logical operation. It is passed explicitly to
//! every service call and is never mutated once built, so an operation can
//! never hop tenants mid-transaction.

mod context;
mod ids;

pub use context::{Actor, TenantContext, TenantContextError};
pub use ids::{MemberId, OrgId, PortalContactId, TenantNamespace};
