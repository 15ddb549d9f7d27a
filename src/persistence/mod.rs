//! Tenant-scoped persistence shared by the proposal and acceptance contexts.
//!
//! Every read is scoped by the caller's [`crate::tenant::TenantContext`], so
//! an entity owned by another tenant is indistinguishable from a missing
//! one. Writes are staged into a [`ports::UnitOfWork`] together with the
//! domain events they produce and applied in one atomic commit; the
//! committed events land in the tenant's outbox before anything is
//! dispatched to subscribers.

pub mod adapters;
pub mod ports;

mod outbox;

pub(crate) use outbox::commit_and_publish;
