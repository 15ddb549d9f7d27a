//! Synchronous in-process fan-out of committed events.

use crate::events::{
    domain::DomainEvent,
    ports::{EventPublisher, EventSubscriber},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Publisher delivering each committed event to every registered
/// subscriber, in registration order.
///
/// A failing subscriber is logged and skipped; it neither stops delivery to
/// the remaining subscribers nor surfaces to the originating operation.
#[derive(Clone, Default)]
pub struct EventFanout {
    subscribers: Vec<Arc<dyn EventSubscriber>>,
}

impl EventFanout {
    /// Creates a publisher with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber.
    #[must_use]
    pub fn with_subscriber(mut self, subscriber: Arc<dyn EventSubscriber>) -> Self {
        self.subscribers.push(subscriber);
        self
    }
}

#[async_trait]
impl EventPublisher for EventFanout {
    async fn publish_committed(&self, events: &[DomainEvent]) {
        for event in events {
            for subscriber in &self.subscribers {
                if let Err(error) = subscriber.handle(event).await {
                    warn!(
                        subscriber = subscriber.name(),
                        event_type = event.event_type().as_str(),
                        event_id = %event.id(),
                        tenant = %event.tenant(),
                        error = %error,
                        "after-commit subscriber failed"
                    );
                }
            }
        }
    }
}
