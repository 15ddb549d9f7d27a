//! Invoice aggregate created in draft for fixed-fee engagements.

use super::{CurrencyCode, CustomerId, InvoiceId, Money, PracticeDomainError, ProjectId};
use crate::tenant::MemberId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice status. The lifecycle engine only ever creates drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Editable, not yet issued.
    Draft,
    /// Issued to the customer.
    Sent,
    /// Settled.
    Paid,
    /// Cancelled.
    Void,
}

/// A single manual line on an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Line description.
    pub description: String,
    /// Quantity billed.
    pub quantity: Decimal,
    /// Price per unit.
    pub unit_price: Decimal,
    /// Line amount (`quantity * unit_price`).
    pub amount: Decimal,
}

impl InvoiceLine {
    /// Creates a quantity-one line for a fixed amount.
    #[must_use]
    pub fn manual(description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            description: description.into(),
            quantity: Decimal::ONE,
            unit_price: amount,
            amount,
        }
    }
}

/// Parameter object for creating a draft invoice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    /// Billed customer.
    pub customer_id: CustomerId,
    /// Project the invoice belongs to.
    pub project_id: ProjectId,
    /// Proposal the invoice was derived from, if any.
    pub proposal_id: Option<Uuid>,
    /// Invoice currency.
    pub currency: CurrencyCode,
    /// Line items.
    pub lines: Vec<InvoiceLine>,
    /// Member creating the invoice.
    pub created_by: MemberId,
}

/// Invoice aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    id: InvoiceId,
    customer_id: CustomerId,
    project_id: ProjectId,
    proposal_id: Option<Uuid>,
    status: InvoiceStatus,
    currency: CurrencyCode,
    lines: Vec<InvoiceLine>,
    created_by: MemberId,
    created_at: DateTime<Utc>,
}

impl Invoice {
    /// Creates a draft invoice.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::EmptyInvoice`] when no lines are given.
    pub fn draft(params: NewInvoice, clock: &impl Clock) -> Result<Self, PracticeDomainError> {
        if params.lines.is_empty() {
            return Err(PracticeDomainError::EmptyInvoice);
        }
        Ok(Self {
            id: InvoiceId::new(),
            customer_id: params.customer_id,
            project_id: params.project_id,
            proposal_id: params.proposal_id,
            status: InvoiceStatus::Draft,
            currency: params.currency,
            lines: params.lines,
            created_by: params.created_by,
            created_at: clock.utc(),
        })
    }

    /// Returns the invoice identifier.
    #[must_use]
    pub const fn id(&self) -> InvoiceId {
        self.id
    }

    /// Returns the billed customer.
    #[must_use]
    pub const fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Returns the project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the originating proposal identifier, if any.
    #[must_use]
    pub const fn proposal_id(&self) -> Option<Uuid> {
        self.proposal_id
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Returns the line items.
    #[must_use]
    pub fn lines(&self) -> &[InvoiceLine] {
        &self.lines
    }

    /// Returns the creating member.
    #[must_use]
    pub const fn created_by(&self) -> MemberId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the invoice total.
    #[must_use]
    pub fn total(&self) -> Money {
        let amount = self.lines.iter().map(|line| line.amount).sum();
        Money::new(amount, self.currency.clone())
    }
}
