//! Sweep that expires sent proposals whose deadline has passed.

use super::{ProposalServiceError, ProposalServiceResult, events};
use crate::events::ports::EventPublisher;
use crate::persistence::{
    commit_and_publish,
    ports::{TenantStore, UnitOfWork},
};
use crate::proposal::domain::Proposal;
use crate::sweep::ExpirySweepReport;
use crate::tenant::TenantContext;
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, warn};

/// Expires one proposal and commits the expiry with its event.
pub(super) async fn expire<S, P, C>(
    store: &S,
    publisher: &P,
    clock: &C,
    ctx: &TenantContext,
    proposal: &mut Proposal,
) -> ProposalServiceResult<()>
where
    S: TenantStore + ?Sized,
    P: EventPublisher + ?Sized,
    C: Clock,
{
    proposal.mark_expired(clock)?;
    let mut unit = UnitOfWork::new();
    unit.update_proposal(proposal);
    unit.record_event(events::expired(ctx, proposal, clock));
    commit_and_publish(store, publisher, ctx, unit).await?;
    Ok(())
}

/// Expires an overdue proposal met during a portal decision and returns
/// the error to report for that decision.
pub(super) async fn expire_overdue<S, P, C>(
    store: &S,
    publisher: &P,
    clock: &C,
    ctx: &TenantContext,
    mut proposal: Proposal,
) -> ProposalServiceError
where
    S: TenantStore + ?Sized,
    P: EventPublisher + ?Sized,
    C: Clock,
{
    match expire(store, publisher, clock, ctx, &mut proposal).await {
        Ok(()) => ProposalServiceError::ProposalExpired(proposal.id()),
        Err(err) => err,
    }
}

/// Batch processor forcing overdue `SENT` proposals to `EXPIRED`.
#[derive(Clone)]
pub struct ProposalExpiryProcessor<S, P, C>
where
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    publisher: Arc<P>,
    clock: Arc<C>,
}

impl<S, P, C> ProposalExpiryProcessor<S, P, C>
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

    /// Expires every `SENT` proposal in the caller's tenant whose deadline
    /// is strictly before now.
    ///
    /// Each proposal commits on its own; a failure is logged and counted
    /// and the sweep moves on. Re-running immediately finds nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalServiceError::Store`] only when the candidate scan
    /// itself fails.
    pub async fn process_expired_proposals(
        &self,
        ctx: &TenantContext,
    ) -> ProposalServiceResult<ExpirySweepReport> {
        let clock = &*self.clock;
        let candidates = self.store.proposals_expired_before(ctx, clock.utc()).await?;

        let mut report = ExpirySweepReport::default();
        for mut proposal in candidates {
            report.examined += 1;
            let proposal_id = proposal.id();
            match expire(&*self.store, &*self.publisher, clock, ctx, &mut proposal).await {
                Ok(()) => report.expired += 1,
                Err(error) => {
                    report.failed += 1;
                    warn!(
                        tenant = %ctx.namespace(),
                        proposal_id = %proposal_id,
                        error = %error,
                        "failed to expire proposal"
                    );
                }
            }
        }

        debug!(
            tenant = %ctx.namespace(),
            examined = report.examined,
            expired = report.expired,
            failed = report.failed,
            "proposal expiry sweep finished"
        );
        Ok(report)
    }
}
