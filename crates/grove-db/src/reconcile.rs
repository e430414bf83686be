//! Referential reconciler.
//!
//! Two call sites:
//!
//! - **Import path** ([`reconcile_imported`]): runs inside the replace
//!   transaction and deletes or unlinks records whose reference points at a
//!   missing parent or at a parent owned by another specimen.
//! - **Startup path** ([`GroveDb::reconcile_startup`]): runs once after the
//!   migration that introduced `measurements.update_id`, synthesizing an
//!   update for each measurement that lacks a valid one on its own specimen.

use chrono::Utc;
use grove_core::responses::ReconcileReport;

use crate::GroveDb;
use crate::error::DatabaseError;
use crate::helpers::ts;

/// Title given to updates synthesized for orphaned measurements.
pub const SYNTHESIZED_UPDATE_TITLE: &str = "Measurement";

/// Import-path reconciliation. Never creates rows.
///
/// # Errors
///
/// Returns `DatabaseError` if any statement fails.
pub async fn reconcile_imported(
    conn: &libsql::Connection,
) -> Result<ReconcileReport, DatabaseError> {
    let measurements_removed = conn
        .execute(
            "DELETE FROM measurements
             WHERE update_id IS NOT NULL
               AND NOT EXISTS (
                   SELECT 1 FROM updates u
                   WHERE u.id = measurements.update_id
                     AND u.specimen_id = measurements.specimen_id)",
            (),
        )
        .await?;

    let measurements_deduplicated = conn
        .execute(
            "DELETE FROM measurements
             WHERE update_id IS NOT NULL
               AND id > (SELECT MIN(m.id) FROM measurements m
                         WHERE m.update_id = measurements.update_id)",
            (),
        )
        .await?;

    let photos_unlinked = conn
        .execute(
            "UPDATE photos SET update_id = NULL
             WHERE update_id IS NOT NULL
               AND NOT EXISTS (
                   SELECT 1 FROM updates u
                   WHERE u.id = photos.update_id
                     AND u.specimen_id = photos.specimen_id)",
            (),
        )
        .await?;

    let accolades_unlinked = conn
        .execute(
            "UPDATE accolades SET photo_id = NULL
             WHERE photo_id IS NOT NULL
               AND NOT EXISTS (
                   SELECT 1 FROM photos p
                   WHERE p.id = accolades.photo_id
                     AND p.specimen_id = accolades.specimen_id)",
            (),
        )
        .await?;

    let report = ReconcileReport {
        measurements_removed,
        measurements_deduplicated,
        photos_unlinked,
        accolades_unlinked,
        updates_synthesized: 0,
    };
    if !report.is_clean() {
        tracing::warn!(
            measurements_removed,
            measurements_deduplicated,
            photos_unlinked,
            accolades_unlinked,
            "reconciled imported references"
        );
    }
    Ok(report)
}

/// Give every measurement without a valid, exclusive update on its own
/// specimen a freshly synthesized one. Returns the number of updates created.
///
/// A measurement qualifies when its `update_id` is null, dangling, owned by a
/// different specimen, or already claimed by a measurement with a lower id.
///
/// # Errors
///
/// Returns `DatabaseError` if any statement fails.
pub async fn link_orphan_measurements(conn: &libsql::Connection) -> Result<u64, DatabaseError> {
    let mut rows = conn
        .query(
            "SELECT m.id, m.specimen_id, COALESCE(m.measured_at, m.created_at)
             FROM measurements m
             WHERE m.update_id IS NULL
                OR NOT EXISTS (
                    SELECT 1 FROM updates u
                    WHERE u.id = m.update_id AND u.specimen_id = m.specimen_id)
                OR EXISTS (
                    SELECT 1 FROM measurements o
                    WHERE o.update_id = m.update_id AND o.id < m.id)
             ORDER BY m.id",
            (),
        )
        .await?;

    let mut orphans = Vec::new();
    while let Some(row) = rows.next().await? {
        orphans.push((
            row.get::<i64>(0)?,
            row.get::<i64>(1)?,
            row.get::<String>(2)?,
        ));
    }
    drop(rows);

    let now = ts(&Utc::now());
    let mut synthesized = 0_u64;
    for (measurement_id, specimen_id, performed_at) in orphans {
        let mut inserted = conn
            .query(
                "INSERT INTO updates (specimen_id, title, performed_at, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)
                 RETURNING id",
                libsql::params![
                    specimen_id,
                    SYNTHESIZED_UPDATE_TITLE,
                    performed_at,
                    now.as_str()
                ],
            )
            .await?;
        let update_id = inserted
            .next()
            .await?
            .ok_or(DatabaseError::NoResult)?
            .get::<i64>(0)?;
        drop(inserted);

        conn.execute(
            "UPDATE measurements SET update_id = ?1 WHERE id = ?2",
            libsql::params![update_id, measurement_id],
        )
        .await?;
        tracing::debug!(measurement_id, specimen_id, update_id, "synthesized update");
        synthesized += 1;
    }

    Ok(synthesized)
}

impl GroveDb {
    /// Startup-path reconciliation in its own transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the pass fails; nothing is committed then.
    pub async fn reconcile_startup(&self) -> Result<ReconcileReport, DatabaseError> {
        let tx = self.conn().transaction().await?;
        let updates_synthesized = link_orphan_measurements(&tx).await?;
        tx.commit().await?;
        Ok(ReconcileReport {
            updates_synthesized,
            ..ReconcileReport::default()
        })
    }
}
