//! Fee models and their terms.

use super::{ParseFeeModelError, ProposalDomainError};
use crate::practice::domain::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the engagement is billed. Fixed at proposal creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeModel {
    /// One agreed amount, optionally split into milestones.
    Fixed,
    /// Billed from recorded time.
    Hourly,
    /// Recurring amount covering a number of hours.
    Retainer,
}

impl FeeModel {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "FIXED",
            Self::Hourly => "HOURLY",
            Self::Retainer => "RETAINER",
        }
    }
}

impl fmt::Display for FeeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for FeeModel {
    type Error = ParseFeeModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FIXED" => Ok(Self::Fixed),
            "HOURLY" => Ok(Self::Hourly),
            "RETAINER" => Ok(Self::Retainer),
            _ => Err(ParseFeeModelError(value.to_owned())),
        }
    }
}

/// Recurring retainer amount and the hours it includes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetainerTerms {
    amount: Money,
    included_hours: Decimal,
}

impl RetainerTerms {
    /// Creates retainer terms.
    ///
    /// # Errors
    ///
    /// Returns [`ProposalDomainError::NegativeRetainerHours`] when the
    /// included hours are negative.
    pub fn new(amount: Money, included_hours: Decimal) -> Result<Self, ProposalDomainError> {
        if included_hours < Decimal::ZERO {
            return Err(ProposalDomainError::NegativeRetainerHours);
        }
        Ok(Self {
            amount,
            included_hours,
        })
    }

    /// Returns the retainer amount.
    #[must_use]
    pub const fn amount(&self) -> &Money {
        &self.amount
    }

    /// Returns the included hours.
    #[must_use]
    pub const fn included_hours(&self) -> Decimal {
        self.included_hours
    }
}
