//! Port contracts for event publication and its downstream recorders.

mod publisher;
mod recorders;

pub use publisher::{EventPublisher, EventSubscriber};
pub use recorders::{AuditRecorder, NotificationRecorder, PortalReadModelWriter, RecorderError};
