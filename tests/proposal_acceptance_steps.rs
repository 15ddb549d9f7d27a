//! Behaviour tests for proposal and document acceptance.

mod test_helpers;

#[path = "proposal_acceptance_steps/mod.rs"]
mod proposal_acceptance_steps_defs;

use proposal_acceptance_steps_defs::world::{AcceptanceWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/proposal_acceptance.feature",
    name = "Client accepts a milestone proposal"
)]
#[tokio::test(flavor = "multi_thread")]
async fn client_accepts_milestone_proposal(world: AcceptanceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/proposal_acceptance.feature",
    name = "Client declines a proposal"
)]
#[tokio::test(flavor = "multi_thread")]
async fn client_declines_proposal(world: AcceptanceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/proposal_acceptance.feature",
    name = "Accepting after the deadline expires the proposal"
)]
#[tokio::test(flavor = "multi_thread")]
async fn late_acceptance_expires_proposal(world: AcceptanceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/proposal_acceptance.feature",
    name = "Client accepts a delivered document"
)]
#[tokio::test(flavor = "multi_thread")]
async fn client_accepts_document(world: AcceptanceWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/proposal_acceptance.feature",
    name = "Revoked links cannot be accepted"
)]
#[tokio::test(flavor = "multi_thread")]
async fn revoked_link_is_refused(world: AcceptanceWorld) {
    let _ = world;
}
