//! Document acceptance from delivery to certificate.

use super::helpers::{LETTER_BYTES, Studio, studio};
use covenant::acceptance::domain::{AcceptanceStatus, AcceptanceSubmission, RequestToken};
use covenant::acceptance::services::{
    AcceptanceServiceError, CreateAcceptanceRequest, certificate_storage_key,
};
use covenant::error::ErrorKind;
use eyre::Result;
use rstest::rstest;
use sha2::{Digest, Sha256};

fn letter(studio: &Studio) -> CreateAcceptanceRequest {
    CreateAcceptanceRequest::new(studio.document.id(), studio.contact.id())
}

fn letter_digest() -> String {
    hex::encode(Sha256::digest(LETTER_BYTES))
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_acceptance_stores_a_certificate(studio: Studio) -> Result<()> {
    let sent = studio
        .acceptances
        .create_and_send(&studio.member(), letter(&studio))
        .await?;
    let client = studio.client();

    let viewed = studio.acceptances.mark_viewed(&client, sent.token()).await?;
    assert_eq!(viewed.status(), AcceptanceStatus::Viewed);
    let accepted = studio
        .acceptances
        .accept(
            &client,
            sent.token(),
            AcceptanceSubmission {
                acceptor_name: "Ada Client".to_owned(),
                acceptor_ip: Some("203.0.113.7".to_owned()),
                acceptor_user_agent: Some("PortalBrowser 2.1".to_owned()),
            },
        )
        .await?;

    assert_eq!(accepted.status(), AcceptanceStatus::Accepted);
    let certificate = accepted.certificate().expect("certificate recorded");
    let key = certificate_storage_key(&studio.namespace, accepted.id());
    assert_eq!(certificate.storage_key, key);
    assert_eq!(
        certificate.file_name,
        "engagement-letter-certificate-of-acceptance.pdf"
    );
    let stored = studio.storage.object(&key).expect("certificate uploaded");
    assert_eq!(stored.content_type, "application/pdf");
    let body = String::from_utf8(stored.bytes)?;
    assert!(body.contains(&letter_digest()));
    assert!(body.contains("203.0.113.7"));
    assert_eq!(
        studio.committed_event_types()?,
        vec![
            "acceptance.created",
            "acceptance.sent",
            "acceptance.viewed",
            "acceptance.accepted",
            "acceptance.certificate_generated",
        ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn resending_a_document_retires_the_old_link(studio: Studio) -> Result<()> {
    let first = studio
        .acceptances
        .create_and_send(&studio.member(), letter(&studio))
        .await?;
    let second = studio
        .acceptances
        .create_and_send(&studio.member(), letter(&studio))
        .await?;

    let retired = studio.acceptances.find(&studio.member(), first.id()).await?;
    assert_eq!(retired.status(), AcceptanceStatus::Revoked);
    assert_ne!(first.token(), second.token());

    let err = studio
        .acceptances
        .accept(
            &studio.client(),
            first.token(),
            AcceptanceSubmission::named("Ada Client"),
        )
        .await
        .expect_err("revoked links cannot be accepted");
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    let current = studio
        .acceptances
        .accept(
            &studio.client(),
            second.token(),
            AcceptanceSubmission::named("Ada Client"),
        )
        .await?;
    assert_eq!(current.status(), AcceptanceStatus::Accepted);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_token_is_not_found(studio: Studio) -> Result<()> {
    let token = RequestToken::from_presented("not-a-real-token");

    let err = studio
        .acceptances
        .mark_viewed(&studio.client(), &token)
        .await
        .expect_err("no such token");

    assert!(matches!(err, AcceptanceServiceError::TokenNotFound));
    assert_eq!(err.kind(), ErrorKind::NotFound);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reminders_count_up_until_acceptance(studio: Studio) -> Result<()> {
    let sent = studio
        .acceptances
        .create_and_send(&studio.member(), letter(&studio))
        .await?;

    studio.acceptances.remind(&studio.member(), sent.id()).await?;
    let reminded = studio.acceptances.remind(&studio.member(), sent.id()).await?;
    assert_eq!(reminded.reminder_count(), 2);

    studio
        .acceptances
        .accept(
            &studio.client(),
            sent.token(),
            AcceptanceSubmission::named("Ada Client"),
        )
        .await?;
    let err = studio
        .acceptances
        .remind(&studio.member(), sent.id())
        .await
        .expect_err("accepted requests need no reminder");
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    Ok(())
}
