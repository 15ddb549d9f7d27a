//! Error types for proposal domain validation and transitions.

use super::{FeeModel, ProposalId, ProposalStatus};
use crate::error::ErrorKind;
use crate::tenant::MemberId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned by proposal mutators and constructors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProposalDomainError {
    /// The requested status transition is not permitted.
    #[error("proposal {proposal_id} cannot move from {from} to {to}")]
    InvalidStateTransition {
        /// Proposal identifier.
        proposal_id: ProposalId,
        /// Current status.
        from: ProposalStatus,
        /// Attempted status.
        to: ProposalStatus,
    },

    /// Field edits require the proposal to be a draft.
    #[error("proposal {proposal_id} is {status} and can no longer be edited")]
    NotEditable {
        /// Proposal identifier.
        proposal_id: ProposalId,
        /// Current status.
        status: ProposalStatus,
    },

    /// Accepted, declined and expired proposals are kept for the record.
    #[error("proposal {proposal_id} is {status} and cannot be deleted")]
    NotDeletable {
        /// Proposal identifier.
        proposal_id: ProposalId,
        /// Current status.
        status: ProposalStatus,
    },

    /// The title is blank after trimming.
    #[error("proposal title must not be empty")]
    EmptyTitle,

    /// The content payload is empty.
    #[error("proposal content must not be empty before sending")]
    EmptyContent,

    /// A fixed-fee proposal lacks a positive fee amount.
    #[error("fixed-fee proposals require a positive fee amount")]
    FixedFeeRequired,

    /// A retainer proposal lacks retainer terms with a positive amount.
    #[error("retainer proposals require retainer terms with a positive amount")]
    RetainerTermsRequired,

    /// Fee terms were supplied that do not belong to the fee model.
    #[error("{field} is not applicable to {fee_model} proposals")]
    FeeTermsMismatch {
        /// Proposal fee model.
        fee_model: FeeModel,
        /// Offending field.
        field: &'static str,
    },

    /// Retainer included hours must not be negative.
    #[error("retainer included hours must not be negative")]
    NegativeRetainerHours,

    /// Milestones split a fixed fee and are meaningless otherwise.
    #[error("milestones are only supported on fixed-fee proposals, not {0}")]
    MilestonesRequireFixedFee(FeeModel),

    /// A milestone percentage is outside `(0, 100]`.
    #[error("milestone percentage {0} must be greater than 0 and at most 100")]
    MilestonePercentageOutOfRange(Decimal),

    /// Milestone percentages do not add up to the whole fee.
    #[error("milestone percentages must sum to 100, got {total}")]
    MilestonePercentagesMismatch {
        /// Actual sum of percentages.
        total: Decimal,
    },

    /// A milestone description is blank.
    #[error("milestone description must not be empty")]
    EmptyMilestoneDescription,

    /// The same member appears twice on the team.
    #[error("member {0} is listed more than once on the proposal team")]
    DuplicateTeamMember(MemberId),

    /// The deadline is not after the current time.
    #[error("proposal expiry must be in the future")]
    DeadlineNotInFuture,
}

impl ProposalDomainError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidStateTransition { .. }
            | Self::NotEditable { .. }
            | Self::NotDeletable { .. } => ErrorKind::InvalidState,
            Self::EmptyTitle
            | Self::EmptyContent
            | Self::FixedFeeRequired
            | Self::RetainerTermsRequired
            | Self::FeeTermsMismatch { .. }
            | Self::NegativeRetainerHours
            | Self::MilestonesRequireFixedFee(_)
            | Self::MilestonePercentageOutOfRange(_)
            | Self::MilestonePercentagesMismatch { .. }
            | Self::EmptyMilestoneDescription
            | Self::DuplicateTeamMember(_)
            | Self::DeadlineNotInFuture => ErrorKind::Validation,
        }
    }
}

/// Error returned while parsing proposal statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown proposal status: {0}")]
pub struct ParseProposalStatusError(pub String);

/// Error returned while parsing fee models.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown fee model: {0}")]
pub struct ParseFeeModelError(pub String);
