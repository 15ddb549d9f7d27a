//! Monetary amounts.

use super::PracticeDomainError;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 alphabetic currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a validated currency code, normalising to uppercase.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::InvalidCurrency`] unless the trimmed
    /// value is exactly three ASCII letters.
    pub fn new(value: impl Into<String>) -> Result<Self, PracticeDomainError> {
        let raw = value.into();
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.len() != 3 || !normalized.chars().all(|ch| ch.is_ascii_uppercase()) {
            return Err(PracticeDomainError::InvalidCurrency(raw));
        }
        Ok(Self(normalized))
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount in a specific currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: CurrencyCode,
}

impl Money {
    /// Number of decimal places kept for invoice amounts.
    pub const MINOR_UNIT_SCALE: u32 = 2;

    /// Creates a money value.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency.
    #[must_use]
    pub const fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Returns whether the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount > Decimal::ZERO
    }

    /// Returns `percentage` percent of this amount, rounded to minor units.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::AmountOverflow`] when the share cannot
    /// be represented.
    pub fn percentage_of(&self, percentage: Decimal) -> Result<Self, PracticeDomainError> {
        let share = self
            .amount
            .checked_mul(percentage)
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .ok_or(PracticeDomainError::AmountOverflow("percentage share"))?;
        Ok(Self::new(round_minor(share), self.currency.clone()))
    }

    /// Subtracts another amount in the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::CurrencyMismatch`] when currencies
    /// differ and [`PracticeDomainError::AmountOverflow`] when the difference
    /// cannot be represented.
    pub fn checked_sub(&self, other: &Self) -> Result<Self, PracticeDomainError> {
        if self.currency != other.currency {
            return Err(PracticeDomainError::CurrencyMismatch {
                left: self.currency.to_string(),
                right: other.currency.to_string(),
            });
        }
        let difference = self
            .amount
            .checked_sub(other.amount)
            .ok_or(PracticeDomainError::AmountOverflow("difference"))?;
        Ok(Self::new(difference, self.currency.clone()))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

/// Rounds to two decimal places, midpoints away from zero.
pub(crate) fn round_minor(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(Money::MINOR_UNIT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}
