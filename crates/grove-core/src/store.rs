//! Collaborator interface between the backup engine and the record store.

use crate::dataset::Dataset;
use crate::responses::ReconcileReport;

/// Dataset-level access to the record store.
///
/// The backup engine never touches individual records; it reads a full
/// snapshot for export and hands a fully built dataset back for import.
#[allow(async_fn_in_trait)]
pub trait DatasetStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read every record of every kind inside one read transaction.
    async fn snapshot(&self) -> Result<Dataset, Self::Error>;

    /// Replace the whole dataset as one unit of work.
    ///
    /// Deletes every existing row (children before parents), inserts
    /// `dataset` (parents before children) and runs import reconciliation.
    /// Any failure rolls back to the prior dataset.
    async fn replace_all(&self, dataset: &Dataset) -> Result<ReconcileReport, Self::Error>;
}
