//! Customer aggregate and its lifecycle status.

use super::{CustomerId, ParseLifecycleStatusError, PracticeDomainError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Commercial lifecycle stage of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStatus {
    /// Not yet engaged.
    Prospect,
    /// Engagement agreed, work being set up.
    Onboarding,
    /// Engagement running.
    Active,
    /// No recent activity.
    Dormant,
    /// Engagement being wound down.
    Offboarding,
    /// Engagement ended.
    Offboarded,
}

impl LifecycleStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prospect => "PROSPECT",
            Self::Onboarding => "ONBOARDING",
            Self::Active => "ACTIVE",
            Self::Dormant => "DORMANT",
            Self::Offboarding => "OFFBOARDING",
            Self::Offboarded => "OFFBOARDED",
        }
    }
}

impl fmt::Display for LifecycleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for LifecycleStatus {
    type Error = ParseLifecycleStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.as_str() {
            "PROSPECT" => Ok(Self::Prospect),
            "ONBOARDING" => Ok(Self::Onboarding),
            "ACTIVE" => Ok(Self::Active),
            "DORMANT" => Ok(Self::Dormant),
            "OFFBOARDING" => Ok(Self::Offboarding),
            "OFFBOARDED" => Ok(Self::Offboarded),
            _ => Err(ParseLifecycleStatusError(value.to_owned())),
        }
    }
}

/// A lifecycle status change applied to a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleTransition {
    /// Status before the change.
    pub from: LifecycleStatus,
    /// Status after the change.
    pub to: LifecycleStatus,
}

/// Customer aggregate, as far as the lifecycle engine needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    lifecycle_status: LifecycleStatus,
    updated_at: DateTime<Utc>,
    revision: u64,
}

impl Customer {
    /// Creates a customer record.
    ///
    /// # Errors
    ///
    /// Returns [`PracticeDomainError::EmptyField`] when the name is blank.
    pub fn new(
        name: impl Into<String>,
        lifecycle_status: LifecycleStatus,
        clock: &impl Clock,
    ) -> Result<Self, PracticeDomainError> {
        let raw = name.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PracticeDomainError::EmptyField("customer name"));
        }
        Ok(Self {
            id: CustomerId::new(),
            name: trimmed.to_owned(),
            lifecycle_status,
            updated_at: clock.utc(),
            revision: 1,
        })
    }

    /// Returns the customer identifier.
    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn lifecycle_status(&self) -> LifecycleStatus {
        self.lifecycle_status
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the optimistic-concurrency revision.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Advances the revision, returning the one the write was based on.
    pub(crate) const fn advance_revision(&mut self) -> u64 {
        let expected = self.revision;
        self.revision += 1;
        expected
    }

    /// Takes the revision after `previous`, for a record replacing it
    /// outside a unit of work.
    pub(crate) const fn supersede(&mut self, previous: &Self) {
        self.revision = previous.revision + 1;
    }

    /// Moves a prospect into onboarding after a won engagement.
    ///
    /// Customers in any other stage are left untouched; the engine never
    /// regresses or skips a lifecycle stage on its own.
    pub fn begin_onboarding(&mut self, clock: &impl Clock) -> Option<LifecycleTransition> {
        if self.lifecycle_status != LifecycleStatus::Prospect {
            return None;
        }
        let transition = LifecycleTransition {
            from: self.lifecycle_status,
            to: LifecycleStatus::Onboarding,
        };
        self.lifecycle_status = LifecycleStatus::Onboarding;
        self.updated_at = clock.utc();
        Some(transition)
    }
}
