//! Commit-then-dispatch helper shared by the lifecycle services.

use crate::events::{domain::DomainEvent, ports::EventPublisher};
use crate::persistence::ports::{StoreResult, TenantStore, UnitOfWork};
use crate::tenant::TenantContext;
use tracing::info;

/// Commits `unit` and, once durable, hands its events to `publisher`.
///
/// Returns the committed events.
pub(crate) async fn commit_and_publish<S, P>(
    store: &S,
    publisher: &P,
    ctx: &TenantContext,
    unit: UnitOfWork,
) -> StoreResult<Vec<DomainEvent>>
where
    S: TenantStore + ?Sized,
    P: EventPublisher + ?Sized,
{
    let events = unit.events().to_vec();
    store.commit(ctx, unit).await?;
    for event in &events {
        info!(
            tenant = %ctx.namespace(),
            entity_type = event.entity_type().as_str(),
            entity_id = %event.entity_id(),
            event_type = event.event_type().as_str(),
            "committed transition"
        );
    }
    publisher.publish_committed(&events).await;
    Ok(events)
}
