//! Periodic expiry sweeps across tenants.
//!
//! Deadlines are enforced lazily whenever a proposal or acceptance request
//! is touched, and eagerly by the [`ExpirySweepScheduler`], which walks every
//! tenant listed by a [`TenantDirectory`] on a fixed interval and runs both
//! expiry processors under a system actor.

mod directory;
mod report;
mod scheduler;

pub use directory::{DirectoryError, InMemoryTenantDirectory, TenantDirectory, TenantEntry};
pub use report::ExpirySweepReport;
pub use scheduler::{ExpirySweepScheduler, SweepSettings, SweepSummary};
