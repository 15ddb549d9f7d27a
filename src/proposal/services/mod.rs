//! Application services for the proposal lifecycle.

mod error;
mod events;
mod expiry;
mod lifecycle;
mod orchestration;

pub use error::{ProposalServiceError, ProposalServiceResult};
pub use expiry::ProposalExpiryProcessor;
pub use lifecycle::{CreateProposalRequest, ProposalService, UpdateProposalRequest};
pub use orchestration::{ProposalAcceptanceOutcome, ProposalOrchestrator};
