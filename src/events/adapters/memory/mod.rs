//! In-memory recorders for tests and embedded use.

mod recorders;

pub use recorders::{InMemoryAuditLog, InMemoryNotificationInbox, InMemoryPortalReadModel};
