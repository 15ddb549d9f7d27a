//! Given steps for acceptance scenarios.

use super::world::{AcceptanceWorld, run_async};
use crate::test_helpers::usd;
use chrono::Duration;
use covenant::acceptance::services::CreateAcceptanceRequest;
use covenant::proposal::domain::{FeeModel, MilestoneDraft};
use covenant::proposal::services::CreateProposalRequest;
use eyre::{WrapErr, eyre};
use mockable::Clock;
use rstest_bdd_macros::given;
use rust_decimal::Decimal;
use serde_json::json;
use std::str::FromStr;

fn fixed_fee_request(
    world: &AcceptanceWorld,
    amount: &str,
) -> Result<CreateProposalRequest, eyre::Report> {
    Ok(CreateProposalRequest::new(
        "Brand refresh",
        world.studio.customer.id(),
        FeeModel::Fixed,
    )
    .with_fixed_fee(usd(amount)?)
    .with_content(json!({ "scope": "Identity and launch assets" })))
}

fn draft_and_send(
    world: &mut AcceptanceWorld,
    request: CreateProposalRequest,
) -> Result<(), eyre::Report> {
    let member = world.studio.member();
    let proposal =
        run_async(world.studio.proposals.create(&member, request)).wrap_err("draft proposal")?;
    run_async(
        world
            .studio
            .proposals
            .send(&member, proposal.id(), world.studio.contact.id()),
    )
    .wrap_err("send proposal")?;
    world.proposal_id = Some(proposal.id());
    Ok(())
}

#[given("a studio with a prospect customer")]
fn studio_with_prospect(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    if world.studio.customer.lifecycle_status().as_str() != "PROSPECT" {
        return Err(eyre!("studio customer should start as a prospect"));
    }
    Ok(())
}

#[given(r#"a proposal with fixed fee "{amount}""#)]
fn proposal_with_fixed_fee(
    world: &mut AcceptanceWorld,
    amount: String,
) -> Result<(), eyre::Report> {
    let request = fixed_fee_request(world, &amount)?;
    draft_and_send(world, request)
}

#[given(r#"a proposal with fixed fee "{amount}" due in {days} days"#)]
fn proposal_with_deadline(
    world: &mut AcceptanceWorld,
    amount: String,
    days: i64,
) -> Result<(), eyre::Report> {
    let deadline = world.studio.clock.utc() + Duration::days(days);
    let request = fixed_fee_request(world, &amount)?.with_expires_at(deadline);
    draft_and_send(world, request)
}

#[given(r#"a milestone proposal of "{amount}" split "{first}" and "{second}""#)]
fn milestone_proposal(
    world: &mut AcceptanceWorld,
    amount: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let request = fixed_fee_request(world, &amount)?.with_milestones([
        MilestoneDraft::new("Discovery", Decimal::from_str(&first)?),
        MilestoneDraft::new("Delivery", Decimal::from_str(&second)?),
    ]);
    draft_and_send(world, request)
}

#[given("the engagement letter is sent for acceptance")]
fn letter_sent(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    let request = CreateAcceptanceRequest::new(
        world.studio.document.id(),
        world.studio.contact.id(),
    );
    let sent = run_async(
        world
            .studio
            .acceptances
            .create_and_send(&world.studio.member(), request),
    )
    .wrap_err("send letter")?;
    world.request = Some(sent);
    Ok(())
}
