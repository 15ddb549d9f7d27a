//! After-commit event delivery.

mod fanout;
mod subscribers;

pub use fanout::EventFanout;
pub use subscribers::{AuditSubscriber, NotificationSubscriber, PortalSyncSubscriber};
