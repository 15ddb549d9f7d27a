//! Proposal child collections: milestones and team members.

use super::{MilestoneId, ProposalDomainError};
use crate::practice::domain::InvoiceId;
use crate::tenant::MemberId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Caller-supplied milestone definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneDraft {
    /// Milestone description, used as the invoice line description.
    pub description: String,
    /// Share of the fixed fee, in percent.
    pub percentage: Decimal,
    /// Days after acceptance the milestone falls due.
    pub relative_due_days: Option<u32>,
}

impl MilestoneDraft {
    /// Creates a draft with no due offset.
    #[must_use]
    pub fn new(description: impl Into<String>, percentage: Decimal) -> Self {
        Self {
            description: description.into(),
            percentage,
            relative_due_days: None,
        }
    }
}

/// Percentage-based installment of a fixed-fee proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    id: MilestoneId,
    description: String,
    percentage: Decimal,
    relative_due_days: Option<u32>,
    sort_order: u32,
    invoice_id: Option<InvoiceId>,
}

impl Milestone {
    /// Returns the milestone identifier.
    #[must_use]
    pub const fn id(&self) -> MilestoneId {
        self.id
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the fee share in percent.
    #[must_use]
    pub const fn percentage(&self) -> Decimal {
        self.percentage
    }

    /// Returns the due offset in days, if any.
    #[must_use]
    pub const fn relative_due_days(&self) -> Option<u32> {
        self.relative_due_days
    }

    /// Returns the position within the proposal.
    #[must_use]
    pub const fn sort_order(&self) -> u32 {
        self.sort_order
    }

    /// Returns the invoice created for this milestone at acceptance.
    #[must_use]
    pub const fn invoice_id(&self) -> Option<InvoiceId> {
        self.invoice_id
    }

    pub(super) fn link_invoice(&mut self, invoice_id: InvoiceId) {
        self.invoice_id = Some(invoice_id);
    }
}

/// Caller-supplied team member entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMemberDraft {
    /// Member to assign on acceptance.
    pub member_id: MemberId,
    /// Free-form role label.
    pub role: Option<String>,
}

/// Member proposed for the engagement team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    member_id: MemberId,
    role: Option<String>,
    sort_order: u32,
}

impl TeamMember {
    /// Returns the member identifier.
    #[must_use]
    pub const fn member_id(&self) -> MemberId {
        self.member_id
    }

    /// Returns the role label.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Returns the position within the team list.
    #[must_use]
    pub const fn sort_order(&self) -> u32 {
        self.sort_order
    }
}

pub(super) fn build_milestones(
    drafts: Vec<MilestoneDraft>,
) -> Result<Vec<Milestone>, ProposalDomainError> {
    if drafts.is_empty() {
        return Ok(Vec::new());
    }

    let mut total = Decimal::ZERO;
    let mut milestones = Vec::with_capacity(drafts.len());
    for (sort_order, draft) in (0_u32..).zip(drafts) {
        let description = draft.description.trim();
        if description.is_empty() {
            return Err(ProposalDomainError::EmptyMilestoneDescription);
        }
        if draft.percentage <= Decimal::ZERO || draft.percentage > Decimal::ONE_HUNDRED {
            return Err(ProposalDomainError::MilestonePercentageOutOfRange(
                draft.percentage,
            ));
        }
        total += draft.percentage;
        milestones.push(Milestone {
            id: MilestoneId::new(),
            description: description.to_owned(),
            percentage: draft.percentage,
            relative_due_days: draft.relative_due_days,
            sort_order,
            invoice_id: None,
        });
    }

    if total != Decimal::ONE_HUNDRED {
        return Err(ProposalDomainError::MilestonePercentagesMismatch { total });
    }
    Ok(milestones)
}

pub(super) fn build_team(
    drafts: Vec<TeamMemberDraft>,
) -> Result<Vec<TeamMember>, ProposalDomainError> {
    let mut seen = HashSet::with_capacity(drafts.len());
    let mut team = Vec::with_capacity(drafts.len());
    for (sort_order, draft) in (0_u32..).zip(drafts) {
        if !seen.insert(draft.member_id) {
            return Err(ProposalDomainError::DuplicateTeamMember(draft.member_id));
        }
        team.push(TeamMember {
            member_id: draft.member_id,
            role: draft
                .role
                .map(|role| role.trim().to_owned())
                .filter(|role| !role.is_empty()),
            sort_order,
        });
    }
    Ok(team)
}
