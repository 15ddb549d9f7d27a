//! Expiry of acceptance requests, lazily and by sweep.

use super::{AcceptanceServiceResult, events};
use crate::acceptance::domain::AcceptanceRequest;
use crate::events::ports::EventPublisher;
use crate::persistence::{
    commit_and_publish,
    ports::{TenantStore, UnitOfWork},
};
use crate::sweep::ExpirySweepReport;
use crate::tenant::TenantContext;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Commits a request already moved to `EXPIRED` together with its event.
pub(super) async fn commit_expiry<S, P, C>(
    store: &S,
    publisher: &P,
    clock: &C,
    ctx: &TenantContext,
    request: &mut AcceptanceRequest,
) -> AcceptanceServiceResult<()>
where
    S: TenantStore + ?Sized,
    P: EventPublisher + ?Sized,
    C: Clock,
{
    let mut unit = UnitOfWork::new();
    unit.update_acceptance_request(request);
    unit.record_event(events::expired(ctx, request, clock));
    commit_and_publish(store, publisher, ctx, unit).await?;
    Ok(())
}

/// Batch processor forcing overdue active requests to `EXPIRED`.
#[derive(Clone)]
pub struct AcceptanceExpiryProcessor<S, P, C>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    publisher: Arc<P>,
    clock: Arc<C>,
}

impl<S, P, C> AcceptanceExpiryProcessor<S, P, C>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a new expiry processor.
    #[must_use]
    pub const fn new(store: Arc<S>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            publisher,
            clock,
        }
    }

    /// Expires every `PENDING`, `SENT` or `VIEWED` request in the caller's
    /// tenant whose deadline is strictly before now.
    ///
    /// Requests commit one at a time; failures are logged and counted.
    ///
    /// # Errors
    ///
    /// Returns [`super::AcceptanceServiceError::Store`] only when the
    /// candidate scan itself fails.
    pub async fn process_expired(
        &self,
        ctx: &TenantContext,
    ) -> AcceptanceServiceResult<ExpirySweepReport> {
        let clock = &*self.clock;
        let candidates = self
            .store
            .acceptance_requests_expired_before(ctx, clock.utc())
            .await?;

        let mut report = ExpirySweepReport::default();
        for mut request in candidates {
            report.examined += 1;
            let request_id = request.id();
            let outcome = match request.mark_expired(clock) {
                Ok(()) => {
                    commit_expiry(&*self.store, &*self.publisher, clock, ctx, &mut request).await
                }
                Err(err) => Err(err.into()),
            };
            match outcome {
                Ok(()) => report.expired += 1,
                Err(error) => {
                    report.failed += 1;
                    warn!(
                        tenant = %ctx.namespace(),
                        request_id = %request_id,
                        error = %error,
                        "failed to expire acceptance request"
                    );
                }
            }
        }

        debug!(
            tenant = %ctx.namespace(),
            examined = report.examined,
            expired = report.expired,
            failed = report.failed,
            "acceptance expiry sweep finished"
        );
        Ok(report)
    }
}
