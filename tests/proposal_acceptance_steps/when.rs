//! When steps for acceptance scenarios.

use super::world::{AcceptanceWorld, run_async};
use chrono::Duration;
use covenant::acceptance::domain::AcceptanceSubmission;
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::when;

#[when("{days} days pass")]
fn days_pass(world: &mut AcceptanceWorld, days: i64) {
    world.studio.clock.advance(Duration::days(days));
}

#[when("the client accepts the proposal")]
fn client_accepts_proposal(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    let proposal_id = world.proposal_id.ok_or_else(|| eyre!("no proposal"))?;
    let result = run_async(world.studio.orchestrator.accept_proposal(
        &world.studio.client(),
        proposal_id,
        world.studio.contact.id(),
    ));
    match result {
        Ok(outcome) => world.outcome = Some(outcome),
        Err(err) => world.proposal_error = Some(err),
    }
    Ok(())
}

#[when(r#"the client declines the proposal saying "{reason}""#)]
fn client_declines_proposal(
    world: &mut AcceptanceWorld,
    reason: String,
) -> Result<(), eyre::Report> {
    let proposal_id = world.proposal_id.ok_or_else(|| eyre!("no proposal"))?;
    run_async(
        world
            .studio
            .proposals
            .decline(&world.studio.client(), proposal_id, Some(reason)),
    )
    .wrap_err("decline proposal")?;
    Ok(())
}

#[when("the client opens the acceptance link")]
fn client_opens_link(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    let token = world
        .request
        .as_ref()
        .ok_or_else(|| eyre!("no acceptance request"))?
        .token()
        .clone();
    let viewed = run_async(
        world
            .studio
            .acceptances
            .mark_viewed(&world.studio.client(), &token),
    )
    .wrap_err("open link")?;
    world.request = Some(viewed);
    Ok(())
}

#[when(r#"the client accepts the document as "{name}""#)]
fn client_accepts_document(world: &mut AcceptanceWorld, name: String) -> Result<(), eyre::Report> {
    let token = world
        .request
        .as_ref()
        .ok_or_else(|| eyre!("no acceptance request"))?
        .token()
        .clone();
    let result = run_async(world.studio.acceptances.accept(
        &world.studio.client(),
        &token,
        AcceptanceSubmission::named(name),
    ));
    match result {
        Ok(accepted) => world.request = Some(accepted),
        Err(err) => world.acceptance_error = Some(err),
    }
    Ok(())
}

#[when("the member revokes the acceptance request")]
fn member_revokes(world: &mut AcceptanceWorld) -> Result<(), eyre::Report> {
    let request_id = world
        .request
        .as_ref()
        .ok_or_else(|| eyre!("no acceptance request"))?
        .id();
    let revoked = run_async(
        world
            .studio
            .acceptances
            .revoke(&world.studio.member(), request_id),
    )
    .wrap_err("revoke request")?;
    world.request = Some(revoked);
    Ok(())
}
