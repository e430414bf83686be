//! # grove-db
//!
//! libSQL record store for Grove.
//!
//! Owns the relational schema and implements the dataset-level
//! [`DatasetStore`](grove_core::store::DatasetStore) interface the backup
//! engine consumes: consistent snapshot reads and atomic wholesale
//! replacement. Also hosts the referential reconciler, which runs after every
//! import and once at startup when the measurement → update link is
//! introduced.

pub mod dataset;
pub mod error;
pub mod helpers;
mod migrations;
pub mod reconcile;
pub mod repos;

use error::DatabaseError;
use grove_core::responses::ReconcileReport;
use libsql::Builder;

/// Central database handle.
pub struct GroveDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    startup_reconcile: Option<ReconcileReport>,
}

impl GroveDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs pending migrations. When this open applies the migration that
    /// introduces `measurements.update_id`, the startup reconciliation runs
    /// once and its report is kept in [`Self::startup_reconcile`].
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened, migrations
    /// fail, or the startup reconciliation fails.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let mut grove_db = Self::open_at_version(path, 0).await?;
        grove_db.migrate_to(migrations::LATEST).await?;
        Ok(grove_db)
    }

    /// Open and migrate only up to `version`, without the startup pass.
    pub(crate) async fn open_at_version(path: &str, version: i64) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        migrations::apply_pending(&conn, version).await?;
        Ok(Self {
            db,
            conn,
            startup_reconcile: None,
        })
    }

    /// Apply pending migrations up to `version` and run the startup
    /// reconciliation if the measurement → update link was just introduced.
    pub(crate) async fn migrate_to(&mut self, version: i64) -> Result<(), DatabaseError> {
        let applied = migrations::apply_pending(&self.conn, version).await?;
        if applied.contains(&migrations::MEASUREMENT_UPDATES) {
            let report = self.reconcile_startup().await?;
            if !report.is_clean() {
                tracing::info!(
                    updates_synthesized = report.updates_synthesized,
                    "linked existing measurements to synthesized updates"
                );
            }
            self.startup_reconcile = Some(report);
        }
        Ok(())
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Report of the startup reconciliation, if this open triggered one.
    #[must_use]
    pub const fn startup_reconcile(&self) -> Option<&ReconcileReport> {
        self.startup_reconcile.as_ref()
    }
}
