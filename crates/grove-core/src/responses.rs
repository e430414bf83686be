//! Report types returned by store and engine operations.

use serde::{Deserialize, Serialize};

/// Outcome of a referential reconciliation pass.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Measurements deleted because their update is missing or belongs to
    /// another specimen.
    pub measurements_removed: u64,
    /// Measurements deleted because another measurement already claims the
    /// same update.
    pub measurements_deduplicated: u64,
    /// Photos whose update link was cleared.
    pub photos_unlinked: u64,
    /// Accolades whose photo link was cleared.
    pub accolades_unlinked: u64,
    /// Updates synthesized for orphaned measurements (startup path only).
    pub updates_synthesized: u64,
}

impl ReconcileReport {
    /// Total number of records touched.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.measurements_removed
            + self.measurements_deduplicated
            + self.photos_unlinked
            + self.accolades_unlinked
            + self.updates_synthesized
    }

    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.total() == 0
    }
}
