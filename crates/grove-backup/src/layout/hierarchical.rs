//! Generation 2: specimen index plus one folder per specimen.

use std::path::Path;

use super::{
    ACCOLADES_FILE, GENERAL_NOTIFICATIONS_TABLE, GRAVEYARD_FILE, INDEX_TABLE, MEASUREMENTS_FILE,
    NOTIFICATIONS_FILE, PHOTOS_FILE, SPECIES_TABLE, TREES_DIR, UPDATES_FILE,
};
use crate::codec::{RawRow, load_table};
use crate::error::BackupError;
use crate::records::{OWNER_COLUMN, RowSet};
use crate::sanitize::safe_entry_path;

pub(super) fn collect_rows(root: &Path) -> Result<RowSet, BackupError> {
    let mut rows = RowSet {
        species: load_table("species", &root.join(SPECIES_TABLE))?,
        ..RowSet::default()
    };
    let trees = root.join(TREES_DIR);

    for index_row in load_table("index", &root.join(INDEX_TABLE))? {
        let specimen_id = index_row.require_id("id")?;
        let owner = specimen_id.to_string();
        let folder = index_row
            .get("folder")
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map_or_else(|| owner.clone(), str::to_string);
        let dir = trees.join(safe_entry_path(&folder)?);
        if !dir.is_dir() {
            return Err(BackupError::MissingSpecimenFolder {
                specimen_id,
                folder: format!("{TREES_DIR}/{folder}"),
            });
        }

        let owned = |table: &str, file: &str| -> Result<Vec<RawRow>, BackupError> {
            let mut loaded = load_table(table, &dir.join(file))?;
            for row in &mut loaded {
                row.fill_missing(OWNER_COLUMN, &owner);
            }
            Ok(loaded)
        };
        rows.updates.extend(owned("updates", UPDATES_FILE)?);
        rows.measurements.extend(owned("measurements", MEASUREMENTS_FILE)?);
        rows.photos.extend(owned("photos", PHOTOS_FILE)?);
        rows.notifications.extend(owned("notifications", NOTIFICATIONS_FILE)?);
        rows.graveyard_entries.extend(owned("graveyard_entries", GRAVEYARD_FILE)?);
        rows.accolades.extend(owned("accolades", ACCOLADES_FILE)?);

        tracing::debug!(specimen_id, folder = %folder, "collected specimen folder");
        rows.specimens.push(index_row);
    }

    rows.notifications
        .extend(load_table("notifications", &root.join(GENERAL_NOTIFICATIONS_TABLE))?);

    Ok(rows)
}
