//! Port contracts for tenant-scoped persistence.

mod store;
mod unit_of_work;

pub use store::{StoreError, StoreResult, TenantStore};
pub use unit_of_work::{StagedWrite, UnitOfWork};
