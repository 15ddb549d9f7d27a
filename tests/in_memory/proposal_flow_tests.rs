//! End-to-end proposal workflows driven through the public services.

use super::helpers::{Studio, brand_refresh, send_proposal, studio, usd};
use covenant::error::ErrorKind;
use covenant::events::domain::{EntityType, NotificationType};
use covenant::persistence::ports::TenantStore;
use covenant::practice::domain::{InvoiceStatus, LifecycleStatus, ProjectTemplate};
use covenant::proposal::domain::{MilestoneDraft, ProposalStatus};
use covenant::tenant::{OrgId, TenantContext, TenantNamespace};
use eyre::Result;
use rstest::rstest;
use rust_decimal::Decimal;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_acceptance_provisions_the_engagement(studio: Studio) -> Result<()> {
    let template = ProjectTemplate::new("Brand sprint", "{customer}: {proposal}")?
        .with_task_names(["Kickoff".to_owned()]);
    studio
        .store
        .insert_project_template(&studio.namespace, template.clone())?;
    let request = brand_refresh(&studio)?
        .with_project_template(template.id())
        .with_milestones([
            MilestoneDraft::new("Discovery", Decimal::from(50)),
            MilestoneDraft::new("Delivery", Decimal::from(50)),
        ]);
    let proposal_id = send_proposal(&studio, request).await?;

    let outcome = studio
        .orchestrator
        .accept_proposal(&studio.client(), proposal_id, studio.contact.id())
        .await?;

    let member = studio.member();
    let project = studio
        .store
        .project(&member, outcome.project_id)
        .await?
        .expect("project stored");
    assert_eq!(project.name(), "Acme Ltd: Brand refresh");
    assert_eq!(project.created_by(), studio.member_id);

    let invoices = studio
        .store
        .invoices_for_project(&member, outcome.project_id)
        .await?;
    let totals: Vec<_> = invoices.iter().map(|invoice| invoice.total()).collect();
    assert_eq!(totals, vec![usd("7500.00")?, usd("7500.00")?]);
    assert!(
        invoices
            .iter()
            .all(|invoice| invoice.status() == InvoiceStatus::Draft)
    );

    let customer = studio
        .store
        .customer(&member, studio.customer.id())
        .await?
        .expect("customer present");
    assert_eq!(customer.lifecycle_status(), LifecycleStatus::Onboarding);

    let proposal = studio.proposals.find(&member, proposal_id).await?;
    assert_eq!(proposal.status(), ProposalStatus::Accepted);
    assert_eq!(proposal.created_project_id(), Some(outcome.project_id));

    let committed = studio.committed_event_types()?;
    assert!(committed.starts_with(&["proposal.created", "proposal.sent", "proposal.accepted"]));
    assert!(committed.contains(&"customer.lifecycle_transitioned"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_decline_notifies_the_author(studio: Studio) -> Result<()> {
    let proposal_id = send_proposal(&studio, brand_refresh(&studio)?).await?;

    let declined = studio
        .proposals
        .decline(
            &studio.client(),
            proposal_id,
            Some("Budget moved to next year".to_owned()),
        )
        .await?;

    assert_eq!(declined.status(), ProposalStatus::Declined);
    assert_eq!(declined.decline_reason(), Some("Budget moved to next year"));
    let notifications = studio.inbox.notifications();
    assert_eq!(notifications.len(), 1);
    let notification = notifications.first().expect("one notification");
    assert_eq!(
        notification.notification_type,
        NotificationType::ProposalDeclined
    );
    assert_eq!(notification.recipient, studio.member_id);
    assert_eq!(notification.reference_entity_id, proposal_id.into_inner());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_sent_proposal_withdraws_it_from_the_portal(studio: Studio) -> Result<()> {
    let proposal_id = send_proposal(&studio, brand_refresh(&studio)?).await?;
    let row = studio
        .portal
        .row(EntityType::Proposal, proposal_id.into_inner())
        .expect("sent proposal projected");
    assert_eq!(row.status, "SENT");

    studio.proposals.delete(&studio.member(), proposal_id).await?;

    assert!(
        studio
            .portal
            .row(EntityType::Proposal, proposal_id.into_inner())
            .is_none()
    );
    let err = studio
        .proposals
        .find(&studio.member(), proposal_id)
        .await
        .expect_err("proposal deleted");
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepted_proposal_cannot_be_deleted(studio: Studio) -> Result<()> {
    let proposal_id = send_proposal(&studio, brand_refresh(&studio)?).await?;
    studio
        .orchestrator
        .accept_proposal(&studio.client(), proposal_id, studio.contact.id())
        .await?;

    let err = studio
        .proposals
        .delete(&studio.member(), proposal_id)
        .await
        .expect_err("accepted proposals are kept");

    assert_eq!(err.kind(), ErrorKind::InvalidState);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn other_tenants_cannot_see_the_proposal(studio: Studio) -> Result<()> {
    let proposal = studio
        .proposals
        .create(&studio.member(), brand_refresh(&studio)?)
        .await?;
    let outsider = TenantContext::member(
        TenantNamespace::new("tenant_rival")?,
        OrgId::new("org-rival")?,
        studio.member_id,
    );

    let err = studio
        .proposals
        .find(&outsider, proposal.id())
        .await
        .expect_err("tenants are isolated");

    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}
