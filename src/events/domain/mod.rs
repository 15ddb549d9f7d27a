//! Event contract shared by every publisher and subscriber.

mod event;
mod records;

pub use event::{DomainEvent, EntityType, EventId, EventType};
pub use records::{AuditRecord, NewNotification, NotificationType, PortalRow};
