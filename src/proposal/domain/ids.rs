//! Identifier types for the proposal domain.

use crate::identifier::uuid_identifier;
use serde::{Deserialize, Serialize};
use std::fmt;

uuid_identifier! {
    /// Unique identifier for a proposal.
    ProposalId
}

uuid_identifier! {
    /// Unique identifier for a proposal milestone.
    MilestoneId
}

/// Human-readable, per-tenant sequential proposal number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalNumber(u32);

impl ProposalNumber {
    /// Wraps a sequence value.
    #[must_use]
    pub const fn new(sequence: u32) -> Self {
        Self(sequence)
    }

    /// Returns the sequence value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProposalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PROP-{:04}", self.0)
    }
}
