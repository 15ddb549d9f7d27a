//! Interval-driven sweep over every tenant.

use super::{DirectoryError, ExpirySweepReport, TenantDirectory};
use crate::acceptance::services::AcceptanceExpiryProcessor;
use crate::events::ports::EventPublisher;
use crate::persistence::ports::TenantStore;
use crate::proposal::services::ProposalExpiryProcessor;
use crate::tenant::TenantContext;
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Whether and how often the sweep runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepSettings {
    enabled: bool,
    interval: Duration,
}

impl SweepSettings {
    /// Creates sweep settings.
    #[must_use]
    pub const fn new(enabled: bool, interval: Duration) -> Self {
        Self { enabled, interval }
    }

    /// Returns whether the sweep runs at all.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the delay between ticks.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for SweepSettings {
    fn default() -> Self {
        Self::new(true, Duration::from_secs(300))
    }
}

/// Totals from one tick across all tenants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepSummary {
    /// Tenants visited.
    pub tenants: usize,
    /// Proposal sweep totals.
    pub proposals: ExpirySweepReport,
    /// Acceptance request sweep totals.
    pub acceptances: ExpirySweepReport,
}

/// Runs both expiry processors for every tenant on an interval.
pub struct ExpirySweepScheduler<T, S, P, C>
where
    T: TenantDirectory,
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    directory: Arc<T>,
    proposals: ProposalExpiryProcessor<S, P, C>,
    acceptances: AcceptanceExpiryProcessor<S, P, C>,
    settings: SweepSettings,
}

impl<T, S, P, C> ExpirySweepScheduler<T, S, P, C>
where
    T: TenantDirectory,
    S: TenantStore,
    P: EventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a scheduler with default settings.
    #[must_use]
    pub fn new(directory: Arc<T>, store: Arc<S>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            directory,
            proposals: ProposalExpiryProcessor::new(
                Arc::clone(&store),
                Arc::clone(&publisher),
                Arc::clone(&clock),
            ),
            acceptances: AcceptanceExpiryProcessor::new(store, publisher, clock),
            settings: SweepSettings::default(),
        }
    }

    /// Replaces the sweep settings.
    #[must_use]
    pub const fn with_settings(mut self, settings: SweepSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sweeps every tenant once.
    ///
    /// A tenant whose candidate scan fails is logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when the tenant list cannot be read.
    pub async fn run_once(&self) -> Result<SweepSummary, DirectoryError> {
        let mut summary = SweepSummary::default();
        for entry in self.directory.tenants().await? {
            summary.tenants += 1;
            let ctx = TenantContext::system(entry.namespace, entry.org_id);

            match self.proposals.process_expired_proposals(&ctx).await {
                Ok(report) => summary.proposals += report,
                Err(error) => warn!(
                    tenant = %ctx.namespace(),
                    error = %error,
                    "proposal expiry sweep failed"
                ),
            }
            match self.acceptances.process_expired(&ctx).await {
                Ok(report) => summary.acceptances += report,
                Err(error) => warn!(
                    tenant = %ctx.namespace(),
                    error = %error,
                    "acceptance expiry sweep failed"
                ),
            }
        }
        Ok(summary)
    }

    /// Ticks until `shutdown` becomes `true` or its sender is dropped.
    ///
    /// Returns immediately when the sweep is disabled. The first tick runs
    /// straight away.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        if !self.settings.enabled() {
            info!("expiry sweep disabled");
            return;
        }
        let mut ticker = tokio::time::interval(self.settings.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => self.tick().await,
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        info!("expiry sweep stopped");
    }

    async fn tick(&self) {
        match self.run_once().await {
            Ok(summary) => debug!(
                tenants = summary.tenants,
                proposals_expired = summary.proposals.expired,
                acceptances_expired = summary.acceptances.expired,
                failed = summary.proposals.failed + summary.acceptances.failed,
                "expiry sweep tick finished"
            ),
            Err(error) => warn!(error = %error, "expiry sweep could not list tenants"),
        }
    }
}
