//! Domain model for proposals.
//!
//! The proposal aggregate owns its milestones and team members and enforces
//! every status guard; services only load, call a mutator and persist.

mod error;
mod fee;
mod ids;
mod milestone;
mod proposal;

pub use error::{ParseFeeModelError, ParseProposalStatusError, ProposalDomainError};
pub use fee::{FeeModel, RetainerTerms};
pub use ids::{MilestoneId, ProposalId, ProposalNumber};
pub use milestone::{Milestone, MilestoneDraft, TeamMember, TeamMemberDraft};
pub use proposal::{InvoiceInstallment, NewProposal, Proposal, ProposalStatus};
