//! Then steps for acceptance scenarios.

use super::world::{AcceptanceWorld, run_async};
use covenant::acceptance::services::certificate_storage_key;
use covenant::persistence::ports::TenantStore;
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::then;

#[then(r#"the proposal is "{status}""#)]
fn proposal_status(world: &AcceptanceWorld, status: String) -> Result<(), eyre::Report> {
    let proposal_id = world.proposal_id.ok_or_else(|| eyre!("no proposal"))?;
    let proposal = run_async(world.studio.proposals.find(&world.studio.member(), proposal_id))
        .wrap_err("load proposal")?;
    if proposal.status().as_str() != status {
        return Err(eyre!(
            "expected proposal {status}, got {}",
            proposal.status().as_str()
        ));
    }
    Ok(())
}

#[then("a project is created for the proposal")]
fn project_created(world: &AcceptanceWorld) -> Result<(), eyre::Report> {
    let outcome = world
        .outcome
        .as_ref()
        .ok_or_else(|| eyre!("proposal was not accepted"))?;
    let project = run_async(
        world
            .studio
            .store
            .project(&world.studio.member(), outcome.project_id),
    )
    .wrap_err("load project")?
    .ok_or_else(|| eyre!("project not stored"))?;
    if project.proposal_id() != Some(outcome.proposal_id.into_inner()) {
        return Err(eyre!("project is not linked to the proposal"));
    }
    Ok(())
}

#[then("{count} draft invoices are raised")]
fn invoices_raised(world: &AcceptanceWorld, count: usize) -> Result<(), eyre::Report> {
    let outcome = world
        .outcome
        .as_ref()
        .ok_or_else(|| eyre!("proposal was not accepted"))?;
    let invoices = run_async(
        world
            .studio
            .store
            .invoices_for_project(&world.studio.member(), outcome.project_id),
    )
    .wrap_err("load invoices")?;
    if invoices.len() != count {
        return Err(eyre!("expected {count} invoices, got {}", invoices.len()));
    }
    Ok(())
}

#[then(r#"the customer is "{status}""#)]
fn customer_status(world: &AcceptanceWorld, status: String) -> Result<(), eyre::Report> {
    let customer = run_async(
        world
            .studio
            .store
            .customer(&world.studio.member(), world.studio.customer.id()),
    )
    .wrap_err("load customer")?
    .ok_or_else(|| eyre!("customer missing"))?;
    if customer.lifecycle_status().as_str() != status {
        return Err(eyre!(
            "expected customer {status}, got {}",
            customer.lifecycle_status().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the author is notified of "{kind}""#)]
fn author_notified(world: &AcceptanceWorld, kind: String) -> Result<(), eyre::Report> {
    let notified = world.studio.inbox.notifications().iter().any(|notification| {
        notification.recipient == world.studio.member_id
            && notification.notification_type.as_str() == kind
    });
    if !notified {
        return Err(eyre!("no {kind} notification for the author"));
    }
    Ok(())
}

#[then(r#"the proposal acceptance is refused as "{kind}""#)]
fn proposal_refused(world: &AcceptanceWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .proposal_error
        .as_ref()
        .ok_or_else(|| eyre!("acceptance unexpectedly succeeded"))?;
    if err.kind().as_str() != kind {
        return Err(eyre!("expected {kind}, got {}: {err}", err.kind()));
    }
    Ok(())
}

#[then("no project exists")]
fn no_project(world: &AcceptanceWorld) -> Result<(), eyre::Report> {
    let projects = world
        .studio
        .store
        .projects(&world.studio.namespace)
        .wrap_err("list projects")?;
    if !projects.is_empty() {
        return Err(eyre!("expected no projects, found {}", projects.len()));
    }
    Ok(())
}

#[then(r#"the acceptance request is "{status}""#)]
fn acceptance_status(world: &AcceptanceWorld, status: String) -> Result<(), eyre::Report> {
    let request_id = world
        .request
        .as_ref()
        .ok_or_else(|| eyre!("no acceptance request"))?
        .id();
    let request = run_async(
        world
            .studio
            .acceptances
            .find(&world.studio.member(), request_id),
    )
    .wrap_err("load acceptance request")?;
    if request.status().as_str() != status {
        return Err(eyre!(
            "expected request {status}, got {}",
            request.status().as_str()
        ));
    }
    Ok(())
}

#[then("a certificate of acceptance is stored")]
fn certificate_stored(world: &AcceptanceWorld) -> Result<(), eyre::Report> {
    let request = world
        .request
        .as_ref()
        .ok_or_else(|| eyre!("no acceptance request"))?;
    let key = certificate_storage_key(&world.studio.namespace, request.id());
    let object = world
        .studio
        .storage
        .object(&key)
        .ok_or_else(|| eyre!("no certificate at {key}"))?;
    if object.content_type != "application/pdf" {
        return Err(eyre!("certificate stored as {}", object.content_type));
    }
    if request.certificate().map(|record| record.storage_key.as_str()) != Some(key.as_str()) {
        return Err(eyre!("certificate not recorded on the request"));
    }
    Ok(())
}

#[then(r#"the document acceptance is refused as "{kind}""#)]
fn document_refused(world: &AcceptanceWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .acceptance_error
        .as_ref()
        .ok_or_else(|| eyre!("acceptance unexpectedly succeeded"))?;
    if err.kind().as_str() != kind {
        return Err(eyre!("expected {kind}, got {}: {err}", err.kind()));
    }
    Ok(())
}
