//! Proposal aggregate root and its state machine.

use super::milestone::{build_milestones, build_team};
use super::{
    FeeModel, Milestone, MilestoneDraft, MilestoneId, ParseProposalStatusError,
    ProposalDomainError, ProposalId, ProposalNumber, RetainerTerms, TeamMember, TeamMemberDraft,
};
use crate::practice::domain::{
    CustomerId, InvoiceId, Money, PracticeDomainError, ProjectId, ProjectTemplateId,
};
use crate::tenant::{MemberId, PortalContactId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Proposal lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    /// Being drafted; fully editable.
    Draft,
    /// Delivered to the customer's portal contact.
    Sent,
    /// Accepted by the customer.
    Accepted,
    /// Declined by the customer.
    Declined,
    /// Deadline passed before a decision.
    Expired,
}

impl ProposalStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Sent => "SENT",
            Self::Accepted => "ACCEPTED",
            Self::Declined => "DECLINED",
            Self::Expired => "EXPIRED",
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Declined | Self::Expired)
    }

    /// Returns whether the state machine has an edge to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Draft, Self::Sent)
                | (Self::Sent, Self::Accepted | Self::Declined | Self::Expired)
        )
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProposalStatus {
    type Error = ParseProposalStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "DRAFT" => Ok(Self::Draft),
            "SENT" => Ok(Self::Sent),
            "ACCEPTED" => Ok(Self::Accepted),
            "DECLINED" => Ok(Self::Declined),
            "EXPIRED" => Ok(Self::Expired),
            _ => Err(ParseProposalStatusError(value.to_owned())),
        }
    }
}

/// Parameter object for creating a draft proposal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProposal {
    /// Proposal title.
    pub title: String,
    /// Customer the proposal is addressed to.
    pub customer_id: CustomerId,
    /// Billing model; immutable after creation.
    pub fee_model: FeeModel,
    /// Fixed fee, for `FIXED` proposals.
    pub fixed_fee: Option<Money>,
    /// Retainer terms, for `RETAINER` proposals.
    pub retainer: Option<RetainerTerms>,
    /// Free-form rich content.
    pub content: Value,
    /// Optional response deadline.
    pub expires_at: Option<DateTime<Utc>>,
    /// Template used to provision the project on acceptance.
    pub project_template_id: Option<ProjectTemplateId>,
    /// Member drafting the proposal.
    pub created_by: MemberId,
}

/// One draft invoice to raise when a fixed-fee proposal is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceInstallment {
    /// Milestone the installment pays for; `None` for a whole-fee invoice.
    pub milestone_id: Option<MilestoneId>,
    /// Invoice line description.
    pub description: String,
    /// Installment amount.
    pub amount: Money,
}

/// Proposal aggregate root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    id: ProposalId,
    number: ProposalNumber,
    title: String,
    customer_id: CustomerId,
    fee_model: FeeModel,
    fixed_fee: Option<Money>,
    retainer: Option<RetainerTerms>,
    content: Value,
    status: ProposalStatus,
    portal_contact_id: Option<PortalContactId>,
    project_template_id: Option<ProjectTemplateId>,
    created_project_id: Option<ProjectId>,
    milestones: Vec<Milestone>,
    team_members: Vec<TeamMember>,
    expires_at: Option<DateTime<Utc>>,
    sent_at: Option<DateTime<Utc>>,
    accepted_at: Option<DateTime<Utc>>,
    declined_at: Option<DateTime<Utc>>,
    expired_at: Option<DateTime<Utc>>,
    decline_reason: Option<String>,
    created_by: MemberId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    revision: u64,
}

impl Proposal {
    /// Creates a draft proposal.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the title is blank, fee terms do not
    /// match the fee model, a supplied amount is not positive, or the
    /// deadline is not in the future.
    pub fn new(
        number: ProposalNumber,
        params: NewProposal,
        clock: &impl Clock,
    ) -> Result<Self, ProposalDomainError> {
        let now = clock.utc();
        let title = normalize_title(&params.title)?;
        check_fixed_fee(params.fee_model, params.fixed_fee.as_ref())?;
        check_retainer(params.fee_model, params.retainer.as_ref())?;
        check_deadline(params.expires_at, now)?;

        Ok(Self {
            id: ProposalId::new(),
            number,
            title,
            customer_id: params.customer_id,
            fee_model: params.fee_model,
            fixed_fee: params.fixed_fee,
            retainer: params.retainer,
            content: params.content,
            status: ProposalStatus::Draft,
            portal_contact_id: None,
            project_template_id: params.project_template_id,
            created_project_id: None,
            milestones: Vec::new(),
            team_members: Vec::new(),
            expires_at: params.expires_at,
            sent_at: None,
            accepted_at: None,
            declined_at: None,
            expired_at: None,
            decline_reason: None,
            created_by: params.created_by,
            created_at: now,
            updated_at: now,
            revision: 1,
        })
    }

    /// Returns the proposal identifier.
    #[must_use]
    pub const fn id(&self) -> ProposalId {
        self.id
    }

    /// Returns the tenant-sequential proposal number.
    #[must_use]
    pub const fn number(&self) -> ProposalNumber {
        self.number
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the customer reference.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the fee model.
    #[must_use]
    pub const fn fee_model(&self) -> FeeModel {
        self.fee_model
    }

    /// Returns the fixed fee.
    #[must_use]
    pub const fn fixed_fee(&self) -> Option<&Money> {
        self.fixed_fee.as_ref()
    }

    /// Returns the retainer terms.
    #[must_use]
    pub const fn retainer(&self) -> Option<&RetainerTerms> {
        self.retainer.as_ref()
    }

    /// Returns the rich content payload.
    #[must_use]
    pub const fn content(&self) -> &Value {
        &self.content
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> ProposalStatus {
        self.status
    }

    /// Returns the portal contact the proposal was sent to.
    #[must_use]
    pub const fn portal_contact_id(&self) -> Option<PortalContactId> {
        self.portal_contact_id
    }

    /// Returns the designated project template.
    #[must_use]
    pub const fn project_template_id(&self) -> Option<ProjectTemplateId> {
        self.project_template_id
    }

    /// Returns the project created on acceptance.
    #[must_use]
    pub const fn created_project_id(&self) -> Option<ProjectId> {
        self.created_project_id
    }

    /// Returns milestones in sort order.
    #[must_use]
    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    /// Returns team members in sort order.
    #[must_use]
    pub fn team_members(&self) -> &[TeamMember] {
        &self.team_members
    }

    /// Returns the response deadline.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns when the proposal was sent.
    #[must_use]
    pub const fn sent_at(&self) -> Option<DateTime<Utc>> {
        self.sent_at
    }

    /// Returns when the proposal was accepted.
    #[must_use]
    pub const fn accepted_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
    }

    /// Returns when the proposal was declined.
    #[must_use]
    pub const fn declined_at(&self) -> Option<DateTime<Utc>> {
        self.declined_at
    }

    /// Returns when the proposal expired.
    #[must_use]
    pub const fn expired_at(&self) -> Option<DateTime<Utc>> {
        self.expired_at
    }

    /// Returns the decline reason.
    #[must_use]
    pub fn decline_reason(&self) -> Option<&str> {
        self.decline_reason.as_deref()
    }

    /// Returns the drafting member.
    #[must_use]
    pub const fn created_by(&self) -> MemberId {
        self.created_by
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

    /// Returns whether the proposal reached a terminal status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns whether a deadline is set and strictly before `now`.
    #[must_use]
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|deadline| deadline < now)
    }

    /// Fails unless the proposal is still a draft.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalDomainError::NotEditable`] for any other status.
    pub const fn require_editable(&self) -> Result<(), ProposalDomainError> {
        match self.status {
            ProposalStatus::Draft => Ok(()),
            status => Err(ProposalDomainError::NotEditable {
                proposal_id: self.id,
                status,
            }),
        }
    }

    /// Fails once the proposal has been accepted, declined or expired.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalDomainError::NotDeletable`] for terminal statuses.
    pub const fn ensure_deletable(&self) -> Result<(), ProposalDomainError> {
        if self.status.is_terminal() {
            return Err(ProposalDomainError::NotDeletable {
                proposal_id: self.id,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Fails when the proposal is not a draft or the title is blank.
    pub fn rename(
        &mut self,
        title: impl AsRef<str>,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.require_editable()?;
        self.title = normalize_title(title.as_ref())?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the rich content payload.
    ///
    /// # Errors
    ///
    /// Fails when the proposal is not a draft.
    pub fn replace_content(
        &mut self,
        content: Value,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.require_editable()?;
        self.content = content;
        self.touch(clock);
        Ok(())
    }

    /// Sets or clears the response deadline.
    ///
    /// # Errors
    ///
    /// Fails when the proposal is not a draft or the deadline has passed.
    pub fn reschedule(
        &mut self,
        expires_at: Option<DateTime<Utc>>,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.require_editable()?;
        check_deadline(expires_at, clock.utc())?;
        self.expires_at = expires_at;
        self.touch(clock);
        Ok(())
    }

    /// Sets or clears the fixed fee.
    ///
    /// # Errors
    ///
    /// Fails when the proposal is not a draft, is not `FIXED`, or the amount
    /// is not positive.
    pub fn set_fixed_fee(
        &mut self,
        fixed_fee: Option<Money>,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.require_editable()?;
        check_fixed_fee(self.fee_model, fixed_fee.as_ref())?;
        self.fixed_fee = fixed_fee;
        self.touch(clock);
        Ok(())
    }

    /// Sets or clears the retainer terms.
    ///
    /// # Errors
    ///
    /// Fails when the proposal is not a draft, is not `RETAINER`, or the
    /// amount is not positive.
    pub fn set_retainer(
        &mut self,
        retainer: Option<RetainerTerms>,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.require_editable()?;
        check_retainer(self.fee_model, retainer.as_ref())?;
        self.retainer = retainer;
        self.touch(clock);
        Ok(())
    }

    /// Sets or clears the project template.
    ///
    /// # Errors
    ///
    /// Fails when the proposal is not a draft.
    pub fn set_project_template(
        &mut self,
        template_id: Option<ProjectTemplateId>,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.require_editable()?;
        self.project_template_id = template_id;
        self.touch(clock);
        Ok(())
    }

    /// Replaces all milestones.
    ///
    /// # Errors
    ///
    /// Fails when the proposal is not a draft, is not `FIXED` (for a
    /// non-empty list), or percentages are out of range or do not sum to 100.
    pub fn replace_milestones(
        &mut self,
        drafts: Vec<MilestoneDraft>,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.require_editable()?;
        if !drafts.is_empty() && self.fee_model != FeeModel::Fixed {
            return Err(ProposalDomainError::MilestonesRequireFixedFee(
                self.fee_model,
            ));
        }
        self.milestones = build_milestones(drafts)?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces the proposed team.
    ///
    /// # Errors
    ///
    /// Fails when the proposal is not a draft or a member is listed twice.
    pub fn replace_team_members(
        &mut self,
        drafts: Vec<TeamMemberDraft>,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.require_editable()?;
        self.team_members = build_team(drafts)?;
        self.touch(clock);
        Ok(())
    }

    /// Checks the fields that must be complete before sending.
    ///
    /// # Errors
    ///
    /// Returns the first missing requirement for the fee model, or
    /// [`ProposalDomainError::EmptyContent`].
    pub fn validate_for_send(&self) -> Result<(), ProposalDomainError> {
        match self.fee_model {
            FeeModel::Fixed if !self.fixed_fee.as_ref().is_some_and(Money::is_positive) => {
                return Err(ProposalDomainError::FixedFeeRequired);
            }
            FeeModel::Retainer
                if !self
                    .retainer
                    .as_ref()
                    .is_some_and(|terms| terms.amount().is_positive()) =>
            {
                return Err(ProposalDomainError::RetainerTermsRequired);
            }
            _ => {}
        }
        if is_empty_content(&self.content) {
            return Err(ProposalDomainError::EmptyContent);
        }
        Ok(())
    }

    /// Moves `DRAFT → SENT` for the given portal contact.
    ///
    /// # Errors
    ///
    /// Fails with an invalid transition unless the proposal is a draft, or
    /// with a validation error from [`Self::validate_for_send`].
    pub fn mark_sent(
        &mut self,
        portal_contact_id: PortalContactId,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.guard_transition(ProposalStatus::Sent)?;
        self.validate_for_send()?;
        let now = self.transition(ProposalStatus::Sent, clock);
        self.portal_contact_id = Some(portal_contact_id);
        self.sent_at = Some(now);
        Ok(())
    }

    /// Moves `SENT → ACCEPTED`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid transition unless the proposal is sent.
    pub fn mark_accepted(&mut self, clock: &impl Clock) -> Result<(), ProposalDomainError> {
        self.guard_transition(ProposalStatus::Accepted)?;
        let now = self.transition(ProposalStatus::Accepted, clock);
        self.accepted_at = Some(now);
        Ok(())
    }

    /// Moves `SENT → DECLINED`, recording an optional reason.
    ///
    /// # Errors
    ///
    /// Fails with an invalid transition unless the proposal is sent.
    pub fn mark_declined(
        &mut self,
        reason: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), ProposalDomainError> {
        self.guard_transition(ProposalStatus::Declined)?;
        let now = self.transition(ProposalStatus::Declined, clock);
        self.declined_at = Some(now);
        self.decline_reason = reason
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        Ok(())
    }

    /// Moves `SENT → EXPIRED`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid transition unless the proposal is sent.
    pub fn mark_expired(&mut self, clock: &impl Clock) -> Result<(), ProposalDomainError> {
        self.guard_transition(ProposalStatus::Expired)?;
        let now = self.transition(ProposalStatus::Expired, clock);
        self.expired_at = Some(now);
        Ok(())
    }

    /// Records the project provisioned on acceptance.
    pub const fn link_project(&mut self, project_id: ProjectId) {
        self.created_project_id = Some(project_id);
    }

    /// Records the invoice raised for a milestone. Returns `false` when the
    /// milestone does not belong to this proposal.
    pub fn link_milestone_invoice(
        &mut self,
        milestone_id: MilestoneId,
        invoice_id: InvoiceId,
    ) -> bool {
        let Some(milestone) = self
            .milestones
            .iter_mut()
            .find(|milestone| milestone.id() == milestone_id)
        else {
            return false;
        };
        milestone.link_invoice(invoice_id);
        true
    }

    /// Splits the fixed fee into draft-invoice installments.
    ///
    /// One installment per milestone in sort order, or a single whole-fee
    /// installment without milestones. Each share is rounded to minor units
    /// and the last milestone absorbs the rounding remainder so the
    /// installments sum to the fee exactly. Non-fixed proposals yield none.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::AmountOverflow`] when a share of the
    /// fee cannot be represented.
    pub fn invoice_installments(&self) -> Result<Vec<InvoiceInstallment>, PracticeDomainError> {
        let Some(fee) = self.fixed_fee.as_ref().filter(|_| self.fee_model == FeeModel::Fixed)
        else {
            return Ok(Vec::new());
        };

        let Some((last, leading)) = self.milestones.split_last() else {
            return Ok(vec![InvoiceInstallment {
                milestone_id: None,
                description: self.title.clone(),
                amount: fee.clone(),
            }]);
        };

        let mut allocated = Money::new(Decimal::ZERO, fee.currency().clone());
        let mut installments = Vec::with_capacity(self.milestones.len());
        for milestone in leading {
            let share = fee.percentage_of(milestone.percentage())?;
            let total = allocated
                .amount()
                .checked_add(share.amount())
                .ok_or(PracticeDomainError::AmountOverflow("allocated installments"))?;
            allocated = Money::new(total, fee.currency().clone());
            installments.push(InvoiceInstallment {
                milestone_id: Some(milestone.id()),
                description: milestone.description().to_owned(),
                amount: share,
            });
        }
        installments.push(InvoiceInstallment {
            milestone_id: Some(last.id()),
            description: last.description().to_owned(),
            amount: fee.checked_sub(&allocated)?,
        });
        Ok(installments)
    }

    pub(crate) const fn advance_revision(&mut self) -> u64 {
        let expected = self.revision;
        self.revision += 1;
        expected
    }

    const fn guard_transition(&self, target: ProposalStatus) -> Result<(), ProposalDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(ProposalDomainError::InvalidStateTransition {
            proposal_id: self.id,
            from: self.status,
            to: target,
        })
    }

    fn transition(&mut self, target: ProposalStatus, clock: &impl Clock) -> DateTime<Utc> {
        let now = clock.utc();
        self.status = target;
        self.updated_at = now;
        now
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

fn normalize_title(title: &str) -> Result<String, ProposalDomainError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ProposalDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}

fn check_fixed_fee(fee_model: FeeModel, fee: Option<&Money>) -> Result<(), ProposalDomainError> {
    match fee {
        None => Ok(()),
        Some(_) if fee_model != FeeModel::Fixed => Err(ProposalDomainError::FeeTermsMismatch {
            fee_model,
            field: "fixed_fee",
        }),
        Some(amount) if !amount.is_positive() => Err(ProposalDomainError::FixedFeeRequired),
        Some(_) => Ok(()),
    }
}

fn check_retainer(
    fee_model: FeeModel,
    terms: Option<&RetainerTerms>,
) -> Result<(), ProposalDomainError> {
    match terms {
        None => Ok(()),
        Some(_) if fee_model != FeeModel::Retainer => Err(ProposalDomainError::FeeTermsMismatch {
            fee_model,
            field: "retainer",
        }),
        Some(terms) if !terms.amount().is_positive() => {
            Err(ProposalDomainError::RetainerTermsRequired)
        }
        Some(_) => Ok(()),
    }
}

fn check_deadline(
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), ProposalDomainError> {
    match expires_at {
        Some(deadline) if deadline <= now => Err(ProposalDomainError::DeadlineNotInFuture),
        _ => Ok(()),
    }
}

fn is_empty_content(content: &Value) -> bool {
    match content {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
