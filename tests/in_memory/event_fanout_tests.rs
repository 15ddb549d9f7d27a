//! Committed events reaching the audit trail, inbox and portal read-model.

use super::helpers::{Studio, brand_refresh, send_proposal, studio};
use covenant::acceptance::domain::AcceptanceSubmission;
use covenant::acceptance::services::CreateAcceptanceRequest;
use covenant::events::domain::{EntityType, EventType, NotificationType};
use eyre::Result;
use rstest::rstest;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn audit_trail_attributes_each_transition(studio: Studio) -> Result<()> {
    let proposal_id = send_proposal(&studio, brand_refresh(&studio)?).await?;
    studio
        .orchestrator
        .accept_proposal(&studio.client(), proposal_id, studio.contact.id())
        .await?;

    let records = studio.audit.records();
    let proposal_trail: Vec<_> = records
        .iter()
        .filter(|record| record.entity_type == EntityType::Proposal)
        .map(|record| (record.event_type, record.actor_type.as_str()))
        .collect();
    assert_eq!(
        proposal_trail,
        vec![
            (EventType::ProposalCreated, "MEMBER"),
            (EventType::ProposalSent, "MEMBER"),
            (EventType::ProposalAccepted, "PORTAL_CONTACT"),
        ]
    );
    assert!(records.iter().all(|record| record.tenant == studio.namespace));
    let accepted = records
        .iter()
        .find(|record| record.event_type == EventType::ProposalAccepted)
        .expect("acceptance audited");
    assert_eq!(accepted.actor_id, Some(studio.contact.id().into_inner()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn portal_row_follows_acceptance_request_status(studio: Studio) -> Result<()> {
    let sent = studio
        .acceptances
        .create_and_send(
            &studio.member(),
            CreateAcceptanceRequest::new(studio.document.id(), studio.contact.id()),
        )
        .await?;
    let row_status = || {
        studio
            .portal
            .row(EntityType::AcceptanceRequest, sent.id().into_inner())
            .map(|row| row.status)
    };
    assert_eq!(row_status().as_deref(), Some("SENT"));

    studio
        .acceptances
        .mark_viewed(&studio.client(), sent.token())
        .await?;
    assert_eq!(row_status().as_deref(), Some("VIEWED"));

    studio
        .acceptances
        .accept(
            &studio.client(),
            sent.token(),
            AcceptanceSubmission::named("Ada Client"),
        )
        .await?;
    let row = studio
        .portal
        .row(EntityType::AcceptanceRequest, sent.id().into_inner())
        .expect("request projected");
    assert_eq!(row.status, "ACCEPTED");
    assert_eq!(row.org_id, studio.org_id);
    assert_eq!(row.fields.get("acceptor_name"), Some(&json!("Ada Client")));
    assert_eq!(
        row.fields.get("document_file_name"),
        Some(&json!("engagement-letter.pdf"))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn document_acceptance_notifies_the_sender(studio: Studio) -> Result<()> {
    let sent = studio
        .acceptances
        .create_and_send(
            &studio.member(),
            CreateAcceptanceRequest::new(studio.document.id(), studio.contact.id()),
        )
        .await?;
    assert!(studio.inbox.notifications().is_empty());

    studio
        .acceptances
        .accept(
            &studio.client(),
            sent.token(),
            AcceptanceSubmission::named("Ada Client"),
        )
        .await?;

    let notifications: Vec<_> = studio
        .inbox
        .notifications()
        .into_iter()
        .map(|notification| {
            (
                notification.notification_type,
                notification.recipient,
                notification.reference_entity_id,
            )
        })
        .collect();
    assert_eq!(
        notifications,
        vec![(
            NotificationType::DocumentAccepted,
            studio.member_id,
            sent.id().into_inner(),
        )]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn request_tokens_stay_out_of_the_audit_trail(studio: Studio) -> Result<()> {
    let sent = studio
        .acceptances
        .create_and_send(
            &studio.member(),
            CreateAcceptanceRequest::new(studio.document.id(), studio.contact.id()),
        )
        .await?;

    let token = json!(sent.token().as_str());
    let leaked = studio
        .audit
        .records()
        .iter()
        .any(|record| record.details.values().any(|value| *value == token));
    assert!(!leaked);
    let row = studio
        .portal
        .row(EntityType::AcceptanceRequest, sent.id().into_inner())
        .expect("request projected");
    assert_eq!(row.fields.get("request_token"), Some(&token));
    Ok(())
}
