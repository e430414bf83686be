//! [`DatasetStore`] implementation: snapshot reads and atomic replacement.

use grove_core::dataset::Dataset;
use grove_core::enums::EntityKind;
use grove_core::responses::ReconcileReport;
use grove_core::store::DatasetStore;

use crate::GroveDb;
use crate::error::DatabaseError;
use crate::reconcile;
use crate::repos::{
    self, accolade, graveyard, measurement, notification, photo, species, specimen, update,
};

impl DatasetStore for GroveDb {
    type Error = DatabaseError;

    async fn snapshot(&self) -> Result<Dataset, DatabaseError> {
        let tx = self.conn().transaction().await?;
        let dataset = read_dataset(&tx).await?;
        tx.commit().await?;
        tracing::debug!(counts = ?dataset.counts(), "read dataset snapshot");
        Ok(dataset)
    }

    async fn replace_all(&self, dataset: &Dataset) -> Result<ReconcileReport, DatabaseError> {
        let tx = self.conn().transaction().await?;
        match write_dataset(&tx, dataset).await {
            Ok(report) => {
                tx.commit().await?;
                tracing::info!(counts = ?dataset.counts(), "replaced dataset");
                Ok(report)
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "rollback after failed replace also failed");
                }
                Err(e)
            }
        }
    }
}

async fn read_dataset(conn: &libsql::Connection) -> Result<Dataset, DatabaseError> {
    Ok(Dataset {
        species: species::list_species(conn).await?,
        specimens: specimen::list_specimens(conn).await?,
        updates: update::list_updates(conn).await?,
        measurements: measurement::list_measurements(conn).await?,
        photos: photo::list_photos(conn).await?,
        notifications: notification::list_notifications(conn).await?,
        graveyard_entries: graveyard::list_graveyard_entries(conn).await?,
        accolades: accolade::list_accolades(conn).await?,
    })
}

/// Delete children before parents, insert parents before children, then
/// reconcile. Runs entirely inside the caller's transaction.
async fn write_dataset(
    conn: &libsql::Connection,
    dataset: &Dataset,
) -> Result<ReconcileReport, DatabaseError> {
    for kind in EntityKind::DELETE_ORDER {
        let removed = repos::delete_all(conn, kind).await?;
        tracing::debug!(%kind, removed, "cleared table");
    }

    for kind in EntityKind::INSERT_ORDER {
        insert_kind(conn, kind, dataset).await?;
    }

    reconcile::reconcile_imported(conn).await
}

async fn insert_kind(
    conn: &libsql::Connection,
    kind: EntityKind,
    dataset: &Dataset,
) -> Result<(), DatabaseError> {
    match kind {
        EntityKind::Species => {
            for s in &dataset.species {
                species::insert_species(conn, s).await?;
            }
        }
        EntityKind::Specimen => {
            for s in &dataset.specimens {
                specimen::insert_specimen(conn, s).await?;
            }
        }
        EntityKind::Update => {
            for u in &dataset.updates {
                update::insert_update(conn, u).await?;
            }
        }
        EntityKind::Measurement => {
            for m in &dataset.measurements {
                measurement::insert_measurement(conn, m).await?;
            }
        }
        EntityKind::Photo => {
            for p in &dataset.photos {
                photo::insert_photo(conn, p).await?;
            }
        }
        EntityKind::Notification => {
            for n in &dataset.notifications {
                notification::insert_notification(conn, n).await?;
            }
        }
        EntityKind::GraveyardEntry => {
            for g in &dataset.graveyard_entries {
                graveyard::insert_graveyard_entry(conn, g).await?;
            }
        }
        EntityKind::Accolade => {
            for a in &dataset.accolades {
                accolade::insert_accolade(conn, a).await?;
            }
        }
    }
    tracing::debug!(%kind, "inserted rows");
    Ok(())
}
