//! Outcome counters for expiry sweeps.

use std::ops::AddAssign;

/// Counts from one sweep pass over one tenant (or, summed, over many).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpirySweepReport {
    /// Entities found past their deadline in an active status.
    pub examined: usize,
    /// Entities moved to `EXPIRED`.
    pub expired: usize,
    /// Entities whose expiry failed and was skipped.
    pub failed: usize,
}

impl ExpirySweepReport {
    /// Returns whether the pass changed nothing and hit no failures.
    #[must_use]
    pub const fn is_quiet(&self) -> bool {
        self.expired == 0 && self.failed == 0
    }
}

impl AddAssign for ExpirySweepReport {
    fn add_assign(&mut self, other: Self) {
        self.examined += other.examined;
        self.expired += other.expired;
        self.failed += other.failed;
    }
}
