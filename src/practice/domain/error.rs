//! Error types for practice domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing practice domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PracticeDomainError {
    /// The currency code is not three uppercase ASCII letters.
    #[error("invalid currency code '{0}', expected ISO 4217 alphabetic code")]
    InvalidCurrency(String),

    /// Arithmetic mixed two currencies.
    #[error("currency mismatch: {left} vs {right}")]
    CurrencyMismatch {
        /// Currency of the left operand.
        left: String,
        /// Currency of the right operand.
        right: String,
    },

    /// An amount calculation left the representable range.
    #[error("amount calculation overflowed: {0}")]
    AmountOverflow(&'static str),

    /// An invoice was built without line items.
    #[error("invoice must contain at least one line item")]
    EmptyInvoice,

    /// A name-like field is blank after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Error returned while parsing a customer lifecycle status.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown customer lifecycle status: {0}")]
pub struct ParseLifecycleStatusError(pub String);
