//! Publication of committed domain events.

use super::RecorderError;
use crate::events::domain::DomainEvent;
use async_trait::async_trait;

/// Delivers events after the unit of work that staged them has committed.
///
/// Publication cannot fail the originating operation: the state change and
/// its events are already durable, so implementations report delivery
/// problems through logging.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Delivers committed events in order.
    async fn publish_committed(&self, events: &[DomainEvent]);
}

/// A listener reacting to committed events.
#[async_trait]
pub trait EventSubscriber: Send + Sync {
    /// Returns a stable subscriber name for diagnostics.
    fn name(&self) -> &'static str;

    /// Handles one committed event.
    ///
    /// # Errors
    ///
    /// Returns [`RecorderError`] when the downstream recorder rejects the
    /// write.
    async fn handle(&self, event: &DomainEvent) -> Result<(), RecorderError>;
}
