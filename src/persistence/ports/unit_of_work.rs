//! Staged writes and events committed together.

use crate::acceptance::domain::AcceptanceRequest;
use crate::events::domain::DomainEvent;
use crate::practice::domain::{Customer, Invoice, Project};
use crate::proposal::domain::{Proposal, ProposalId};

/// One entity write awaiting commit.
#[derive(Debug, Clone)]
pub enum StagedWrite {
    /// Insert a new proposal.
    InsertProposal(Box<Proposal>),
    /// Replace a proposal whose stored revision is `expected_revision`.
    UpdateProposal {
        /// New proposal state.
        proposal: Box<Proposal>,
        /// Revision the write was based on.
        expected_revision: u64,
    },
    /// Remove a proposal whose stored revision is `expected_revision`.
    DeleteProposal {
        /// Proposal to remove.
        id: ProposalId,
        /// Revision the delete was based on.
        expected_revision: u64,
    },
    /// Insert a new acceptance request.
    InsertAcceptanceRequest(Box<AcceptanceRequest>),
    /// Replace an acceptance request whose stored revision is
    /// `expected_revision`.
    UpdateAcceptanceRequest {
        /// New request state.
        request: Box<AcceptanceRequest>,
        /// Revision the write was based on.
        expected_revision: u64,
    },
    /// Insert a new project.
    InsertProject(Box<Project>),
    /// Insert a new invoice.
    InsertInvoice(Box<Invoice>),
    /// Replace a customer whose stored revision is `expected_revision`.
    UpdateCustomer {
        /// New customer state.
        customer: Box<Customer>,
        /// Revision the write was based on.
        expected_revision: u64,
    },
}

/// Entity writes plus the events describing them, applied atomically.
///
/// Update methods take the aggregate mutably: they capture the revision the
/// caller loaded and advance the aggregate to the revision it will hold once
/// committed.
#[derive(Debug, Clone, Default)]
pub struct UnitOfWork {
    writes: Vec<StagedWrite>,
    events: Vec<DomainEvent>,
}

impl UnitOfWork {
    /// Creates an empty unit of work.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages a proposal insert.
    pub fn insert_proposal(&mut self, proposal: &Proposal) {
        self.writes
            .push(StagedWrite::InsertProposal(Box::new(proposal.clone())));
    }

    /// Stages a proposal update.
    pub fn update_proposal(&mut self, proposal: &mut Proposal) {
        let expected_revision = proposal.advance_revision();
        self.writes.push(StagedWrite::UpdateProposal {
            proposal: Box::new(proposal.clone()),
            expected_revision,
        });
    }

    /// Stages a proposal delete.
    pub fn delete_proposal(&mut self, proposal: &Proposal) {
        self.writes.push(StagedWrite::DeleteProposal {
            id: proposal.id(),
            expected_revision: proposal.revision(),
        });
    }

    /// Stages an acceptance request insert.
    pub fn insert_acceptance_request(&mut self, request: &AcceptanceRequest) {
        self.writes
            .push(StagedWrite::InsertAcceptanceRequest(Box::new(request.clone())));
    }

    /// Stages an acceptance request update.
    pub fn update_acceptance_request(&mut self, request: &mut AcceptanceRequest) {
        let expected_revision = request.advance_revision();
        self.writes.push(StagedWrite::UpdateAcceptanceRequest {
            request: Box::new(request.clone()),
            expected_revision,
        });
    }

    /// Stages a project insert.
    pub fn insert_project(&mut self, project: &Project) {
        self.writes
            .push(StagedWrite::InsertProject(Box::new(project.clone())));
    }

    /// Stages an invoice insert.
    pub fn insert_invoice(&mut self, invoice: &Invoice) {
        self.writes
            .push(StagedWrite::InsertInvoice(Box::new(invoice.clone())));
    }

    /// Stages a customer update.
    pub fn update_customer(&mut self, customer: &mut Customer) {
        let expected_revision = customer.advance_revision();
        self.writes.push(StagedWrite::UpdateCustomer {
            customer: Box::new(customer.clone()),
            expected_revision,
        });
    }

    /// Stages an event to write to the outbox with the entity changes.
    pub fn record_event(&mut self, event: DomainEvent) {
        self.events.push(event);
    }

    /// Returns the staged writes in order.
    #[must_use]
    pub fn writes(&self) -> &[StagedWrite] {
        &self.writes
    }

    /// Returns the staged events in order.
    #[must_use]
    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Returns whether nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty() && self.events.is_empty()
    }

    /// Splits the unit into its writes and events.
    #[must_use]
    pub fn into_parts(self) -> (Vec<StagedWrite>, Vec<DomainEvent>) {
        (self.writes, self.events)
    }
}
