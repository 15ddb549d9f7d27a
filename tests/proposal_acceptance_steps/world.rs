//! Shared world state for proposal and document acceptance scenarios.

use crate::test_helpers::Studio;
use covenant::acceptance::domain::AcceptanceRequest;
use covenant::acceptance::services::AcceptanceServiceError;
use covenant::practice::domain::LifecycleStatus;
use covenant::proposal::domain::ProposalId;
use covenant::proposal::services::{ProposalAcceptanceOutcome, ProposalServiceError};
use rstest::fixture;

/// Scenario world for acceptance behaviour tests.
pub struct AcceptanceWorld {
    pub studio: Studio,
    pub proposal_id: Option<ProposalId>,
    pub outcome: Option<ProposalAcceptanceOutcome>,
    pub proposal_error: Option<ProposalServiceError>,
    pub request: Option<AcceptanceRequest>,
    pub acceptance_error: Option<AcceptanceServiceError>,
}

impl AcceptanceWorld {
    /// Creates a world around a freshly seeded studio.
    #[must_use]
    pub fn new() -> Self {
        Self {
            studio: Studio::new(LifecycleStatus::Prospect).expect("studio seeded"),
            proposal_id: None,
            outcome: None,
            proposal_error: None,
            request: None,
            acceptance_error: None,
        }
    }
}

impl Default for AcceptanceWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> AcceptanceWorld {
    AcceptanceWorld::new()
}

/// Blocks on a future from a synchronous step.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
