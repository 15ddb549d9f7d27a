//! Shared fixtures for in-memory integration tests.

pub use crate::test_helpers::{LETTER_BYTES, Studio, usd};

use covenant::practice::domain::LifecycleStatus;
use covenant::proposal::domain::{FeeModel, ProposalId};
use covenant::proposal::services::CreateProposalRequest;
use eyre::Result;
use rstest::fixture;
use serde_json::json;

/// Provides a studio whose customer is still a prospect.
#[fixture]
pub fn studio() -> Studio {
    Studio::new(LifecycleStatus::Prospect).expect("studio seeded")
}

/// Fixed-fee proposal for the studio's customer.
///
/// # Errors
///
/// Returns an error when the fee amount cannot be built.
pub fn brand_refresh(studio: &Studio) -> Result<CreateProposalRequest> {
    Ok(
        CreateProposalRequest::new("Brand refresh", studio.customer.id(), FeeModel::Fixed)
            .with_fixed_fee(usd("15000.00")?)
            .with_content(json!({ "scope": "Identity, guidelines and launch assets" })),
    )
}

/// Drafts and sends a proposal to the studio's portal contact.
///
/// # Errors
///
/// Returns an error when drafting or sending fails.
pub async fn send_proposal(studio: &Studio, request: CreateProposalRequest) -> Result<ProposalId> {
    let proposal = studio.proposals.create(&studio.member(), request).await?;
    studio
        .proposals
        .send(&studio.member(), proposal.id(), studio.contact.id())
        .await?;
    Ok(proposal.id())
}
