//! Generation 1: one table per kind under `data/`, owners by `bonsai_id`.

use std::path::Path;

use crate::codec::load_table;
use crate::error::BackupError;
use crate::records::RowSet;

pub(super) fn collect_rows(root: &Path) -> Result<RowSet, BackupError> {
    let data = root.join("data");
    let table = |name: &str| load_table(name, &data.join(format!("{name}.csv")));

    let rows = RowSet {
        species: table("species")?,
        specimens: table("bonsai")?,
        updates: table("updates")?,
        measurements: table("measurements")?,
        photos: table("photos")?,
        notifications: table("notifications")?,
        graveyard_entries: table("graveyard_entries")?,
        accolades: table("accolades")?,
    };
    tracing::debug!(
        specimens = rows.specimens.len(),
        photos = rows.photos.len(),
        "collected flat archive rows"
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn reads_owner_from_explicit_column() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data");
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("bonsai.csv"), "id,name\n4,Juniper\n").unwrap();
        fs::write(data.join("updates.csv"), "id,bonsai_id,title\n1,4,Wire\n").unwrap();

        let rows = collect_rows(dir.path()).unwrap();
        assert_eq!(rows.specimens.len(), 1);
        assert_eq!(rows.updates[0].require_id("bonsai_id").unwrap(), 4);
        assert!(rows.accolades.is_empty());
    }
}
