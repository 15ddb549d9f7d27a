//! Subscribers translating domain events into recorder writes.

use crate::events::{
    domain::{AuditRecord, DomainEvent, EventType, NewNotification, NotificationType, PortalRow},
    ports::{
        AuditRecorder, EventSubscriber, NotificationRecorder, PortalReadModelWriter,
        RecorderError,
    },
};
use async_trait::async_trait;
use mockable::Clock;
use std::sync::Arc;

/// Writes one audit entry per event.
#[derive(Clone)]
pub struct AuditSubscriber<R>
where
    R: AuditRecorder,
{
    recorder: Arc<R>,
}

impl<R> AuditSubscriber<R>
where
    R: AuditRecorder,
{
    /// Creates an audit subscriber.
    #[must_use]
    pub const fn new(recorder: Arc<R>) -> Self {
        Self { recorder }
    }
}

#[async_trait]
impl<R> EventSubscriber for AuditSubscriber<R>
where
    R: AuditRecorder,
{
    fn name(&self) -> &'static str {
        "audit"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), RecorderError> {
        self.recorder.record(AuditRecord::from(event)).await
    }
}

/// Creates notifications for outcome events that carry a recipient.
#[derive(Clone)]
pub struct NotificationSubscriber<R>
where
    R: NotificationRecorder,
{
    recorder: Arc<R>,
}

impl<R> NotificationSubscriber<R>
where
    R: NotificationRecorder,
{
    /// Creates a notification subscriber.
    #[must_use]
    pub const fn new(recorder: Arc<R>) -> Self {
        Self { recorder }
    }
}

#[async_trait]
impl<R> EventSubscriber for NotificationSubscriber<R>
where
    R: NotificationRecorder,
{
    fn name(&self) -> &'static str {
        "notification"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), RecorderError> {
        let (Some(notification_type), Some(recipient)) = (
            NotificationType::for_event(event.event_type()),
            event.recipient(),
        ) else {
            return Ok(());
        };

        self.recorder
            .create(NewNotification {
                tenant: event.tenant().clone(),
                notification_type,
                reference_entity_id: event.entity_id(),
                recipient,
            })
            .await
    }
}

/// Projects status changes into the portal read-model.
#[derive(Clone)]
pub struct PortalSyncSubscriber<W, C>
where
    W: PortalReadModelWriter,
    C: Clock + Send + Sync,
{
    writer: Arc<W>,
    clock: Arc<C>,
}

impl<W, C> PortalSyncSubscriber<W, C>
where
    W: PortalReadModelWriter,
    C: Clock + Send + Sync,
{
    /// Creates a portal sync subscriber.
    #[must_use]
    pub const fn new(writer: Arc<W>, clock: Arc<C>) -> Self {
        Self { writer, clock }
    }
}

#[async_trait]
impl<W, C> EventSubscriber for PortalSyncSubscriber<W, C>
where
    W: PortalReadModelWriter,
    C: Clock + Send + Sync,
{
    fn name(&self) -> &'static str {
        "portal_sync"
    }

    async fn handle(&self, event: &DomainEvent) -> Result<(), RecorderError> {
        if event.event_type() == EventType::ProposalDeleted {
            return self
                .writer
                .remove(event.entity_type(), event.entity_id())
                .await;
        }

        let Some(status) = event.event_type().resulting_status() else {
            return Ok(());
        };

        self.writer
            .upsert(PortalRow {
                entity_type: event.entity_type(),
                entity_id: event.entity_id(),
                tenant: event.tenant().clone(),
                org_id: event.org_id().clone(),
                status: status.to_owned(),
                fields: event.portal_fields().clone(),
                synced_at: self.clock.utc(),
            })
            .await
    }
}
