//! Scheduled expiry sweeps over registered tenants.

use super::helpers::{Studio, brand_refresh, send_proposal, studio};
use crate::test_helpers::SteppingClock;
use chrono::Duration;
use covenant::acceptance::domain::AcceptanceStatus;
use covenant::acceptance::services::CreateAcceptanceRequest;
use covenant::events::domain::{EntityType, NotificationType};
use covenant::events::services::EventFanout;
use covenant::persistence::adapters::memory::InMemoryTenantStore;
use covenant::proposal::domain::ProposalStatus;
use covenant::sweep::{ExpirySweepScheduler, InMemoryTenantDirectory, SweepSettings};
use eyre::{Result, eyre};
use mockable::Clock;
use rstest::rstest;
use std::sync::Arc;
use tokio::sync::watch;

type Sweep =
    ExpirySweepScheduler<InMemoryTenantDirectory, InMemoryTenantStore, EventFanout, SteppingClock>;

fn scheduler(studio: &Studio) -> Result<Sweep> {
    let directory = Arc::new(InMemoryTenantDirectory::new());
    directory.register(studio.namespace.clone(), studio.org_id.clone())?;
    Ok(ExpirySweepScheduler::new(
        directory,
        studio.store.clone(),
        studio.publisher.clone(),
        studio.clock.clone(),
    ))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_pass_expires_overdue_proposals_and_requests(studio: Studio) -> Result<()> {
    let deadline = studio.clock.utc() + Duration::days(1);
    let proposal_id =
        send_proposal(&studio, brand_refresh(&studio)?.with_expires_at(deadline)).await?;
    let request = studio
        .acceptances
        .create_and_send(
            &studio.member(),
            CreateAcceptanceRequest::new(studio.document.id(), studio.contact.id())
                .with_expires_at(deadline),
        )
        .await?;
    studio.clock.advance(Duration::days(2));
    let sweep = scheduler(&studio)?;

    let summary = sweep.run_once().await?;

    assert_eq!(summary.tenants, 1);
    assert_eq!(summary.proposals.expired, 1);
    assert_eq!(summary.acceptances.expired, 1);
    let proposal = studio.proposals.find(&studio.member(), proposal_id).await?;
    assert_eq!(proposal.status(), ProposalStatus::Expired);
    let stored = studio.acceptances.find(&studio.member(), request.id()).await?;
    assert_eq!(stored.status(), AcceptanceStatus::Expired);

    let mut kinds: Vec<_> = studio
        .inbox
        .notifications()
        .into_iter()
        .filter(|notification| notification.recipient == studio.member_id)
        .map(|notification| notification.notification_type.as_str())
        .collect();
    kinds.sort_unstable();
    assert_eq!(kinds, vec!["ACCEPTANCE_EXPIRED", "PROPOSAL_EXPIRED"]);
    let row = studio
        .portal
        .row(EntityType::Proposal, proposal_id.into_inner())
        .expect("proposal projected");
    assert_eq!(row.status, "EXPIRED");

    let again = sweep.run_once().await?;
    assert!(again.proposals.is_quiet());
    assert!(again.acceptances.is_quiet());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_work_inside_its_deadline_is_left_alone(studio: Studio) -> Result<()> {
    let proposal_id = send_proposal(
        &studio,
        brand_refresh(&studio)?.with_expires_at(studio.clock.utc() + Duration::days(10)),
    )
    .await?;
    studio.clock.advance(Duration::days(9));

    let summary = scheduler(&studio)?.run_once().await?;

    assert_eq!(summary.proposals.examined, 0);
    let proposal = studio.proposals.find(&studio.member(), proposal_id).await?;
    assert_eq!(proposal.status(), ProposalStatus::Sent);
    assert!(
        !studio
            .inbox
            .notifications()
            .iter()
            .any(|notification| notification.notification_type
                == NotificationType::ProposalExpired)
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn background_loop_sweeps_until_shutdown(studio: Studio) -> Result<()> {
    let deadline = studio.clock.utc() + Duration::hours(1);
    let proposal_id =
        send_proposal(&studio, brand_refresh(&studio)?.with_expires_at(deadline)).await?;
    studio.clock.advance(Duration::hours(2));
    let sweep = Arc::new(
        scheduler(&studio)?
            .with_settings(SweepSettings::new(true, std::time::Duration::from_secs(3600))),
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let handle = tokio::spawn({
        let looping = Arc::clone(&sweep);
        async move { looping.run(shutdown_rx).await }
    });

    let mut expired = false;
    for _ in 0..100 {
        let proposal = studio.proposals.find(&studio.member(), proposal_id).await?;
        if proposal.status() == ProposalStatus::Expired {
            expired = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    shutdown_tx.send(true)?;
    tokio::time::timeout(std::time::Duration::from_secs(5), handle)
        .await
        .map_err(|_| eyre!("sweep loop did not stop"))??;

    assert!(expired, "first tick should expire the overdue proposal");
    Ok(())
}
