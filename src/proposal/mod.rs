//! Proposal lifecycle for Covenant.
//!
//! Proposals move `DRAFT → SENT → {ACCEPTED | DECLINED | EXPIRED}`. Drafts
//! are freely editable; once sent, only the defined transitions change a
//! proposal. Acceptance is orchestrated as one unit of work that provisions
//! the project, draft invoices and team assignments, and nudges the
//! customer's lifecycle. A periodic sweep expires proposals whose deadline
//! has passed. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Orchestration services in [`services`]
//!
//! Persistence goes through the shared [`crate::persistence`] ports because
//! acceptance writes span several aggregates in one commit.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
