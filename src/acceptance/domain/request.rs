//! Acceptance request aggregate and its state machine.

use super::{AcceptanceDomainError, AcceptanceRequestId, ParseAcceptanceStatusError, RequestToken};
use crate::practice::domain::{CustomerId, DocumentId};
use crate::tenant::{MemberId, PortalContactId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Acceptance request lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AcceptanceStatus {
    /// Created, not yet delivered.
    Pending,
    /// Delivered to the portal contact.
    Sent,
    /// Opened in the portal.
    Viewed,
    /// Accepted by the portal contact.
    Accepted,
    /// Deadline passed before acceptance.
    Expired,
    /// Withdrawn by a member.
    Revoked,
}

impl AcceptanceStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Sent => "SENT",
            Self::Viewed => "VIEWED",
            Self::Accepted => "ACCEPTED",
            Self::Expired => "EXPIRED",
            Self::Revoked => "REVOKED",
        }
    }

    /// Returns whether the request still awaits a decision.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Sent | Self::Viewed)
    }

    /// Returns whether the status is final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }
}

impl fmt::Display for AcceptanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AcceptanceStatus {
    type Error = ParseAcceptanceStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "SENT" => Ok(Self::Sent),
            "VIEWED" => Ok(Self::Viewed),
            "ACCEPTED" => Ok(Self::Accepted),
            "EXPIRED" => Ok(Self::Expired),
            "REVOKED" => Ok(Self::Revoked),
            _ => Err(ParseAcceptanceStatusError(value.to_owned())),
        }
    }
}

/// Parameter object for creating an acceptance request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAcceptanceRequest {
    /// Document to accept.
    pub document_id: DocumentId,
    /// Contact asked to accept.
    pub portal_contact_id: PortalContactId,
    /// Customer owning the document.
    pub customer_id: CustomerId,
    /// Portal capability token.
    pub token: RequestToken,
    /// Acceptance deadline.
    pub expires_at: DateTime<Utc>,
    /// Member sending the request.
    pub sent_by: MemberId,
}

/// Acceptor metadata captured from the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceSubmission {
    /// Name typed by the acceptor.
    pub acceptor_name: String,
    /// Client IP address, if known.
    pub acceptor_ip: Option<String>,
    /// Client user agent, if known.
    pub acceptor_user_agent: Option<String>,
}

impl AcceptanceSubmission {
    /// Creates a submission with no client metadata.
    #[must_use]
    pub fn named(acceptor_name: impl Into<String>) -> Self {
        Self {
            acceptor_name: acceptor_name.into(),
            acceptor_ip: None,
            acceptor_user_agent: None,
        }
    }
}

/// Where the acceptance certificate was stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRecord {
    /// Storage key of the certificate PDF.
    pub storage_key: String,
    /// Display file name.
    pub file_name: String,
}

/// Acceptance request aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceRequest {
    id: AcceptanceRequestId,
    document_id: DocumentId,
    portal_contact_id: PortalContactId,
    customer_id: CustomerId,
    token: RequestToken,
    status: AcceptanceStatus,
    expires_at: DateTime<Utc>,
    sent_at: Option<DateTime<Utc>>,
    viewed_at: Option<DateTime<Utc>>,
    accepted_at: Option<DateTime<Utc>>,
    revoked_at: Option<DateTime<Utc>>,
    expired_at: Option<DateTime<Utc>>,
    acceptor: Option<AcceptanceSubmission>,
    reminder_count: u32,
    last_reminded_at: Option<DateTime<Utc>>,
    certificate: Option<CertificateRecord>,
    sent_by: MemberId,
    revoked_by: Option<MemberId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
}

impl AcceptanceRequest {
    /// Creates a `PENDING` request.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceDomainError::DeadlineNotInFuture`] when the
    /// deadline is not after the current time.
    pub fn new(
        params: NewAcceptanceRequest,
        clock: &impl Clock,
    ) -> Result<Self, AcceptanceDomainError> {
        let now = clock.utc();
        if params.expires_at <= now {
            return Err(AcceptanceDomainError::DeadlineNotInFuture);
        }
        Ok(Self {
            id: AcceptanceRequestId::new(),
            document_id: params.document_id,
            portal_contact_id: params.portal_contact_id,
            customer_id: params.customer_id,
            token: params.token,
            status: AcceptanceStatus::Pending,
            expires_at: params.expires_at,
            sent_at: None,
            viewed_at: None,
            accepted_at: None,
            revoked_at: None,
            expired_at: None,
            acceptor: None,
            reminder_count: 0,
            last_reminded_at: None,
            certificate: None,
            sent_by: params.sent_by,
            revoked_by: None,
            created_at: now,
            updated_at: now,
            revision: 1,
        })
    }

    /// Returns the request identifier.
    #[must_use]
    pub const fn id(&self) -> AcceptanceRequestId {
        self.id
    }

    /// Returns the document reference.
    #[must_use]
    pub const fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Returns the portal contact reference.
    #[must_use]
    pub const fn portal_contact_id(&self) -> PortalContactId {
        self.portal_contact_id
    }

    /// Returns the customer owning the document.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the portal token.
    #[must_use]
    pub const fn token(&self) -> &RequestToken {
        &self.token
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> AcceptanceStatus {
        self.status
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns when the request was sent.
    #[must_use]
    pub const fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }

    /// Returns when the request was first viewed.
    #[must_use]
    pub const fn viewed_at(&self) -> Option<DateTime<Utc>> {
        self.viewed_at
    }

    /// Returns when the request was accepted.
    #[must_use]
    pub const fn accepted_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
    }

    /// Returns when the request was revoked.
    #[must_use]
    pub const fn revoked_at(&self) -> Option<DateTime<Utc>> {
        self.revoked_at
    }

    /// Returns when the request expired.
    #[must_use]
    pub const fn expired_at(&self) -> Option<DateTime<Utc>> {
        self.expired_at
    }

    /// Returns the acceptor metadata once accepted.
    #[must_use]
    pub const fn acceptor(&self) -> Option<&AcceptanceSubmission> {
        self.acceptor.as_ref()
    }

    /// Returns how many reminders were sent.
    #[must_use]
    pub const fn reminder_count(&self) -> u32 {
        self.reminder_count
    }

    /// Returns when the last reminder was sent.
    #[must_use]
    pub const fn last_reminded_at(&self) -> Option<DateTime<Utc>> {
        self.last_reminded_at
    }

    /// Returns the stored certificate, once generated.
    #[must_use]
    pub const fn certificate(&self) -> Option<&CertificateRecord> {
        self.certificate.as_ref()
    }

    /// Returns the sending member.
    #[must_use]
    pub const fn sent_by(&self) -> MemberId {
        self.sent_by
    }

    /// Returns the revoking member.
    #[must_use]
    pub const fn revoked_by(&self) -> Option<MemberId> {
        self.revoked_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic-concurrency revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns whether the request is `PENDING`, `SENT` or `VIEWED`.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns whether the deadline is strictly before `now`.
    #[must_use]
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    /// Moves `PENDING → SENT`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid transition from any other status.
    pub fn mark_sent(&mut self, clock: &impl Clock) -> Result<(), AcceptanceDomainError> {
        if self.status != AcceptanceStatus::Pending {
            return Err(self.invalid(AcceptanceStatus::Sent));
        }
        let now = self.transition(AcceptanceStatus::Sent, clock);
        self.sent_at = Some(now);
        Ok(())
    }

    /// Moves `PENDING | SENT → VIEWED`.
    ///
    /// Returns `false` without changes when already viewed, keeping the
    /// original view timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceDomainError::Expired`] after moving the request
    /// to `EXPIRED` when the deadline has passed, or an invalid transition
    /// from a terminal status.
    pub fn mark_viewed(&mut self, clock: &impl Clock) -> Result<bool, AcceptanceDomainError> {
        match self.status {
            AcceptanceStatus::Viewed => return Ok(false),
            AcceptanceStatus::Pending | AcceptanceStatus::Sent => {}
            _ => return Err(self.invalid(AcceptanceStatus::Viewed)),
        }
        self.expire_if_past_deadline(clock)?;
        let now = self.transition(AcceptanceStatus::Viewed, clock);
        self.viewed_at = Some(now);
        Ok(true)
    }

    /// Moves an active request to `ACCEPTED`, capturing acceptor metadata.
    ///
    /// Returns `false` without changes when already accepted.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceDomainError::Expired`] after moving the request
    /// to `EXPIRED` when the deadline has passed, an invalid transition from
    /// `EXPIRED` or `REVOKED`, or
    /// [`AcceptanceDomainError::EmptyAcceptorName`].
    pub fn mark_accepted(
        &mut self,
        submission: AcceptanceSubmission,
        clock: &impl Clock,
    ) -> Result<bool, AcceptanceDomainError> {
        if self.status == AcceptanceStatus::Accepted {
            return Ok(false);
        }
        if !self.is_active() {
            return Err(self.invalid(AcceptanceStatus::Accepted));
        }
        self.expire_if_past_deadline(clock)?;

        let acceptor_name = submission.acceptor_name.trim();
        if acceptor_name.is_empty() {
            return Err(AcceptanceDomainError::EmptyAcceptorName);
        }
        let acceptor = AcceptanceSubmission {
            acceptor_name: acceptor_name.to_owned(),
            acceptor_ip: non_blank(submission.acceptor_ip),
            acceptor_user_agent: non_blank(submission.acceptor_user_agent),
        };

        let now = self.transition(AcceptanceStatus::Accepted, clock);
        self.accepted_at = Some(now);
        self.acceptor = Some(acceptor);
        Ok(true)
    }

    /// Moves an active request to `REVOKED`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid transition from a terminal status.
    pub fn mark_revoked(
        &mut self,
        revoked_by: MemberId,
        clock: &impl Clock,
    ) -> Result<(), AcceptanceDomainError> {
        if !self.is_active() {
            return Err(self.invalid(AcceptanceStatus::Revoked));
        }
        let now = self.transition(AcceptanceStatus::Revoked, clock);
        self.revoked_at = Some(now);
        self.revoked_by = Some(revoked_by);
        Ok(())
    }

    /// Moves an active request to `EXPIRED`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid transition from a terminal status.
    pub fn mark_expired(&mut self, clock: &impl Clock) -> Result<(), AcceptanceDomainError> {
        if !self.is_active() {
            return Err(self.invalid(AcceptanceStatus::Expired));
        }
        let now = self.transition(AcceptanceStatus::Expired, clock);
        self.expired_at = Some(now);
        Ok(())
    }

    /// Counts a reminder for a delivered, undecided request.
    ///
    /// # Errors
    ///
    /// Returns [`AcceptanceDomainError::NotRemindable`] unless the request
    /// is `SENT` or `VIEWED`.
    pub fn record_reminder(&mut self, clock: &impl Clock) -> Result<u32, AcceptanceDomainError> {
        if !matches!(
            self.status,
            AcceptanceStatus::Sent | AcceptanceStatus::Viewed
        ) {
            return Err(AcceptanceDomainError::NotRemindable {
                request_id: self.id,
                status: self.status,
            });
        }
        let now = clock.utc();
        self.reminder_count = self.reminder_count.saturating_add(1);
        self.last_reminded_at = Some(now);
        self.updated_at = now;
        Ok(self.reminder_count)
    }

    /// Records where the acceptance certificate was stored.
    pub fn record_certificate(&mut self, certificate: CertificateRecord, clock: &impl Clock) {
        self.certificate = Some(certificate);
        self.updated_at = clock.utc();
    }

    pub(crate) const fn advance_revision(&mut self) -> u64 {
        let expected = self.revision;
        self.revision += 1;
        expected
    }

    fn expire_if_past_deadline(&mut self, clock: &impl Clock) -> Result<(), AcceptanceDomainError> {
        let now = clock.utc();
        if !self.is_past_deadline(now) {
            return Ok(());
        }
        self.status = AcceptanceStatus::Expired;
        self.expired_at = Some(now);
        self.updated_at = now;
        Err(AcceptanceDomainError::Expired {
            request_id: self.id,
            expires_at: self.expires_at,
        })
    }

    const fn invalid(&self, target: AcceptanceStatus) -> AcceptanceDomainError {
        AcceptanceDomainError::InvalidStateTransition {
            request_id: self.id,
            from: self.status,
            to: target,
        }
    }

    fn transition(&mut self, target: AcceptanceStatus, clock: &impl Clock) -> DateTime<Utc> {
        let now = clock.utc();
        self.status = target;
        self.updated_at = now;
        now
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_owned())
        .filter(|text| !text.is_empty())
}
