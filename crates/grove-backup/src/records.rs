//! Entity ↔ table row conversion and batch reference validation.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use grove_core::dataset::Dataset;
use grove_core::entities::{
    Accolade, GraveyardEntry, Measurement, Notification, Photo, Species, Specimen, Update,
};

use crate::codec::{self, RawRow};
use crate::error::BackupError;

/// Column carrying the owning specimen id in flat tables. Hierarchical rows
/// get it filled in from their folder's index row.
pub const OWNER_COLUMN: &str = "bonsai_id";

pub const SPECIES_COLUMNS: [&str; 8] = [
    "id",
    "common_name",
    "scientific_name",
    "description",
    "care_instructions",
    "tree_count",
    "created_at",
    "updated_at",
];

pub const INDEX_COLUMNS: [&str; 14] = [
    "id",
    "name",
    "species_id",
    "species_common_name",
    "species_scientific_name",
    "acquisition_date",
    "origin_date",
    "location",
    "notes",
    "development_stage",
    "status",
    "created_at",
    "updated_at",
    "folder",
];

pub const OVERVIEW_COLUMNS: [&str; 13] = [
    "id",
    "name",
    "species_id",
    "species_common_name",
    "species_scientific_name",
    "status",
    "acquisition_date",
    "origin_date",
    "location",
    "notes",
    "development_stage",
    "created_at",
    "updated_at",
];

pub const UPDATE_COLUMNS: [&str; 6] = [
    "id",
    "title",
    "description",
    "performed_at",
    "created_at",
    "updated_at",
];

pub const MEASUREMENT_COLUMNS: [&str; 8] = [
    "id",
    "update_id",
    "measured_at",
    "height_cm",
    "trunk_diameter_cm",
    "canopy_width_cm",
    "notes",
    "created_at",
];

pub const PHOTO_COLUMNS: [&str; 9] = [
    "id",
    "description",
    "taken_at",
    "full_path",
    "thumbnail_path",
    "is_primary",
    "update_id",
    "update_title",
    "created_at",
];

pub const NOTIFICATION_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "message",
    "category",
    "due_at",
    "read",
    "created_at",
];

pub const GRAVEYARD_COLUMNS: [&str; 4] = ["id", "category", "note", "moved_at"];

pub const ACCOLADE_COLUMNS: [&str; 5] = ["id", "title", "photo_id", "created_at", "updated_at"];

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

pub fn species_row(s: &Species) -> Vec<String> {
    vec![
        s.id.to_string(),
        s.common_name.clone(),
        codec::opt_text(s.scientific_name.as_deref()),
        codec::opt_text(s.description.as_deref()),
        codec::opt_text(s.care_instructions.as_deref()),
        s.tree_count.to_string(),
        codec::timestamp(&s.created_at),
        codec::timestamp(&s.updated_at),
    ]
}

pub fn index_row(s: &Specimen, species: Option<&Species>, folder: &str) -> Vec<String> {
    vec![
        s.id.to_string(),
        s.name.clone(),
        codec::opt_id(s.species_id),
        codec::opt_text(species.map(|sp| sp.common_name.as_str())),
        codec::opt_text(species.and_then(|sp| sp.scientific_name.as_deref())),
        codec::opt_date(s.acquisition_date.as_ref()),
        codec::opt_date(s.origin_date.as_ref()),
        codec::opt_text(s.location.as_deref()),
        codec::opt_text(s.notes.as_deref()),
        codec::opt_text(s.development_stage.as_deref()),
        s.status.clone(),
        codec::timestamp(&s.created_at),
        codec::timestamp(&s.updated_at),
        folder.to_string(),
    ]
}

pub fn overview_row(s: &Specimen, species: Option<&Species>) -> Vec<String> {
    vec![
        s.id.to_string(),
        s.name.clone(),
        codec::opt_id(s.species_id),
        codec::opt_text(species.map(|sp| sp.common_name.as_str())),
        codec::opt_text(species.and_then(|sp| sp.scientific_name.as_deref())),
        s.status.clone(),
        codec::opt_date(s.acquisition_date.as_ref()),
        codec::opt_date(s.origin_date.as_ref()),
        codec::opt_text(s.location.as_deref()),
        codec::opt_text(s.notes.as_deref()),
        codec::opt_text(s.development_stage.as_deref()),
        codec::timestamp(&s.created_at),
        codec::timestamp(&s.updated_at),
    ]
}

pub fn update_row(u: &Update) -> Vec<String> {
    vec![
        u.id.to_string(),
        u.title.clone(),
        codec::opt_text(u.description.as_deref()),
        codec::opt_timestamp(u.performed_at.as_ref()),
        codec::timestamp(&u.created_at),
        codec::timestamp(&u.updated_at),
    ]
}

pub fn measurement_row(m: &Measurement) -> Vec<String> {
    vec![
        m.id.to_string(),
        codec::opt_id(m.update_id),
        codec::opt_timestamp(m.measured_at.as_ref()),
        codec::opt_number(m.height_cm),
        codec::opt_number(m.trunk_diameter_cm),
        codec::opt_number(m.canopy_width_cm),
        codec::opt_text(m.notes.as_deref()),
        codec::timestamp(&m.created_at),
    ]
}

pub fn photo_row(p: &Photo, update_title: Option<&str>) -> Vec<String> {
    vec![
        p.id.to_string(),
        codec::opt_text(p.description.as_deref()),
        codec::opt_timestamp(p.taken_at.as_ref()),
        p.full_path.clone(),
        p.thumbnail_path.clone(),
        codec::boolean(p.is_primary),
        codec::opt_id(p.update_id),
        codec::opt_text(update_title),
        codec::timestamp(&p.created_at),
    ]
}

pub fn notification_row(n: &Notification) -> Vec<String> {
    vec![
        n.id.to_string(),
        n.title.clone(),
        n.message.clone(),
        codec::opt_text(n.category.as_deref()),
        codec::opt_timestamp(n.due_at.as_ref()),
        codec::boolean(n.read),
        codec::timestamp(&n.created_at),
    ]
}

pub fn graveyard_row(g: &GraveyardEntry) -> Vec<String> {
    vec![
        g.id.to_string(),
        g.category.clone(),
        codec::opt_text(g.note.as_deref()),
        codec::timestamp(&g.moved_at),
    ]
}

pub fn accolade_row(a: &Accolade) -> Vec<String> {
    vec![
        a.id.to_string(),
        a.title.clone(),
        codec::opt_id(a.photo_id),
        codec::timestamp(&a.created_at),
        codec::timestamp(&a.updated_at),
    ]
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Untyped rows per kind, as collected by a layout strategy.
#[derive(Debug, Default)]
pub struct RowSet {
    pub species: Vec<RawRow>,
    pub specimens: Vec<RawRow>,
    pub updates: Vec<RawRow>,
    pub measurements: Vec<RawRow>,
    pub photos: Vec<RawRow>,
    pub notifications: Vec<RawRow>,
    pub graveyard_entries: Vec<RawRow>,
    pub accolades: Vec<RawRow>,
}

impl RowSet {
    /// Parse every row into typed records.
    ///
    /// `now` fills timestamps the store requires but the archive left empty.
    ///
    /// # Errors
    ///
    /// The first `MissingField` or `InvalidField` encountered.
    pub fn into_dataset(self, now: DateTime<Utc>) -> Result<Dataset, BackupError> {
        Ok(Dataset {
            species: parse_all(&self.species, |r| species_from(r, now))?,
            specimens: parse_all(&self.specimens, |r| specimen_from(r, now))?,
            updates: parse_all(&self.updates, |r| update_from(r, now))?,
            measurements: parse_all(&self.measurements, |r| measurement_from(r, now))?,
            photos: parse_all(&self.photos, |r| photo_from(r, now))?,
            notifications: parse_all(&self.notifications, |r| notification_from(r, now))?,
            graveyard_entries: parse_all(&self.graveyard_entries, |r| graveyard_from(r, now))?,
            accolades: parse_all(&self.accolades, |r| accolade_from(r, now))?,
        })
    }
}

fn parse_all<T>(
    rows: &[RawRow],
    parse: impl Fn(&RawRow) -> Result<T, BackupError>,
) -> Result<Vec<T>, BackupError> {
    rows.iter().map(parse).collect()
}

fn species_from(r: &RawRow, now: DateTime<Utc>) -> Result<Species, BackupError> {
    Ok(Species {
        id: r.require_id("id")?,
        common_name: r.string("common_name"),
        scientific_name: r.opt_string("scientific_name"),
        description: r.opt_string("description"),
        care_instructions: r.opt_string("care_instructions"),
        tree_count: r.opt_id("tree_count")?.unwrap_or(0),
        created_at: r.timestamp_or("created_at", now)?,
        updated_at: r.timestamp_or("updated_at", now)?,
    })
}

fn specimen_from(r: &RawRow, now: DateTime<Utc>) -> Result<Specimen, BackupError> {
    Ok(Specimen {
        id: r.require_id("id")?,
        name: r.string("name"),
        species_id: r.opt_id("species_id")?,
        acquisition_date: r.opt_date("acquisition_date")?,
        origin_date: r.opt_date("origin_date")?,
        location: r.opt_string("location"),
        notes: r.opt_string("notes"),
        development_stage: r.opt_string("development_stage"),
        status: r
            .opt_string("status")
            .unwrap_or_else(|| Specimen::DEFAULT_STATUS.to_string()),
        created_at: r.timestamp_or("created_at", now)?,
        updated_at: r.timestamp_or("updated_at", now)?,
    })
}

fn update_from(r: &RawRow, now: DateTime<Utc>) -> Result<Update, BackupError> {
    Ok(Update {
        id: r.require_id("id")?,
        specimen_id: r.require_id(OWNER_COLUMN)?,
        title: r.string("title"),
        description: r.opt_string("description"),
        performed_at: r.opt_timestamp("performed_at")?,
        created_at: r.timestamp_or("created_at", now)?,
        updated_at: r.timestamp_or("updated_at", now)?,
    })
}

fn measurement_from(r: &RawRow, now: DateTime<Utc>) -> Result<Measurement, BackupError> {
    Ok(Measurement {
        id: r.require_id("id")?,
        specimen_id: r.require_id(OWNER_COLUMN)?,
        update_id: r.opt_id("update_id")?,
        measured_at: r.opt_timestamp("measured_at")?,
        height_cm: r.opt_number("height_cm")?,
        trunk_diameter_cm: r.opt_number("trunk_diameter_cm")?,
        canopy_width_cm: r.opt_number("canopy_width_cm")?,
        notes: r.opt_string("notes"),
        created_at: r.timestamp_or("created_at", now)?,
    })
}

fn photo_from(r: &RawRow, now: DateTime<Utc>) -> Result<Photo, BackupError> {
    Ok(Photo {
        id: r.require_id("id")?,
        specimen_id: r.require_id(OWNER_COLUMN)?,
        update_id: r.opt_id("update_id")?,
        description: r.opt_string("description"),
        taken_at: r.opt_timestamp("taken_at")?,
        full_path: r.string("full_path"),
        thumbnail_path: r.string("thumbnail_path"),
        is_primary: r.flag("is_primary"),
        created_at: r.timestamp_or("created_at", now)?,
    })
}

fn notification_from(r: &RawRow, now: DateTime<Utc>) -> Result<Notification, BackupError> {
    Ok(Notification {
        id: r.require_id("id")?,
        specimen_id: r.opt_id(OWNER_COLUMN)?,
        title: r.string("title"),
        message: r.string("message"),
        category: r.opt_string("category"),
        due_at: r.opt_timestamp("due_at")?,
        read: r.flag("read"),
        created_at: r.timestamp_or("created_at", now)?,
    })
}

fn graveyard_from(r: &RawRow, now: DateTime<Utc>) -> Result<GraveyardEntry, BackupError> {
    Ok(GraveyardEntry {
        id: r.require_id("id")?,
        specimen_id: r.require_id(OWNER_COLUMN)?,
        category: r
            .opt_string("category")
            .unwrap_or_else(|| GraveyardEntry::DEFAULT_CATEGORY.to_string()),
        note: r.opt_string("note"),
        moved_at: r.timestamp_or("moved_at", now)?,
    })
}

fn accolade_from(r: &RawRow, now: DateTime<Utc>) -> Result<Accolade, BackupError> {
    Ok(Accolade {
        id: r.require_id("id")?,
        specimen_id: r.require_id(OWNER_COLUMN)?,
        title: r.string("title"),
        photo_id: r.opt_id("photo_id")?,
        created_at: r.timestamp_or("created_at", now)?,
        updated_at: r.timestamp_or("updated_at", now)?,
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn check(
    ids: &HashSet<i64>,
    value: Option<i64>,
    field: &str,
    target: &'static str,
) -> Result<(), BackupError> {
    match value {
        Some(v) if !ids.contains(&v) => Err(BackupError::DanglingReference {
            field: field.to_string(),
            value: v,
            target,
        }),
        _ => Ok(()),
    }
}

/// Every foreign key must resolve inside the batch, and each specimen has at
/// most one graveyard entry.
///
/// # Errors
///
/// `DanglingReference` or `DuplicateGraveyardEntry` for the first violation.
pub fn validate_references(dataset: &Dataset) -> Result<(), BackupError> {
    let species: HashSet<i64> = dataset.species.iter().map(|s| s.id).collect();
    let specimens: HashSet<i64> = dataset.specimens.iter().map(|s| s.id).collect();
    let updates: HashSet<i64> = dataset.updates.iter().map(|u| u.id).collect();
    let photos: HashSet<i64> = dataset.photos.iter().map(|p| p.id).collect();

    for s in &dataset.specimens {
        check(&species, s.species_id, "specimens.species_id", "species")?;
    }
    for u in &dataset.updates {
        check(&specimens, Some(u.specimen_id), "updates.specimen_id", "specimen")?;
    }
    for m in &dataset.measurements {
        check(&specimens, Some(m.specimen_id), "measurements.specimen_id", "specimen")?;
        check(&updates, m.update_id, "measurements.update_id", "update")?;
    }
    for p in &dataset.photos {
        check(&specimens, Some(p.specimen_id), "photos.specimen_id", "specimen")?;
        check(&updates, p.update_id, "photos.update_id", "update")?;
    }
    for n in &dataset.notifications {
        check(&specimens, n.specimen_id, "notifications.specimen_id", "specimen")?;
    }
    let mut buried = HashSet::new();
    for g in &dataset.graveyard_entries {
        check(&specimens, Some(g.specimen_id), "graveyard_entries.specimen_id", "specimen")?;
        if !buried.insert(g.specimen_id) {
            return Err(BackupError::DuplicateGraveyardEntry {
                specimen_id: g.specimen_id,
            });
        }
    }
    for a in &dataset.accolades {
        check(&specimens, Some(a.specimen_id), "accolades.specimen_id", "specimen")?;
        check(&photos, a.photo_id, "accolades.photo_id", "photo")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn missing_store_timestamps_default_to_import_time() {
        let rows = RowSet {
            graveyard_entries: vec![RawRow::new(
                "graveyard_entries",
                [("id", "1"), (OWNER_COLUMN, "3"), ("category", ""), ("moved_at", "")],
            )],
            ..RowSet::default()
        };
        let dataset = rows.into_dataset(now()).unwrap();
        let entry = &dataset.graveyard_entries[0];
        assert_eq!(entry.moved_at, now());
        assert_eq!(entry.category, GraveyardEntry::DEFAULT_CATEGORY);
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        let rows = RowSet {
            updates: vec![RawRow::new(
                "updates",
                [
                    ("id", "1"),
                    (OWNER_COLUMN, "3"),
                    ("performed_at", "2024-05-01T10:00:00"),
                    ("created_at", "2024-05-01 10:00:00.250"),
                ],
            )],
            ..RowSet::default()
        };
        let dataset = rows.into_dataset(now()).unwrap();
        let update = &dataset.updates[0];
        assert_eq!(
            update.performed_at,
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
        assert_eq!(update.updated_at, now());
    }

    #[test]
    fn bad_date_names_the_field() {
        let rows = RowSet {
            specimens: vec![RawRow::new(
                "bonsai",
                [("id", "1"), ("acquisition_date", "yesterday")],
            )],
            ..RowSet::default()
        };
        let err = rows.into_dataset(now()).unwrap_err();
        assert!(matches!(&err, BackupError::InvalidField { field, .. } if field == "bonsai.acquisition_date"));
    }

    #[test]
    fn owned_rows_require_their_owner() {
        let rows = RowSet {
            photos: vec![RawRow::new("photos", [("id", "1")])],
            ..RowSet::default()
        };
        let err = rows.into_dataset(now()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required value for photos.bonsai_id");
    }

    fn specimen(id: i64) -> Specimen {
        Specimen {
            id,
            name: format!("tree {id}"),
            species_id: None,
            acquisition_date: None,
            origin_date: None,
            location: None,
            notes: None,
            development_stage: None,
            status: Specimen::DEFAULT_STATUS.to_string(),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn grave(id: i64, specimen_id: i64) -> GraveyardEntry {
        GraveyardEntry {
            id,
            specimen_id,
            category: GraveyardEntry::DEFAULT_CATEGORY.to_string(),
            note: None,
            moved_at: now(),
        }
    }

    #[test]
    fn dangling_species_reference_is_rejected() {
        let mut s = specimen(1);
        s.species_id = Some(42);
        let dataset = Dataset {
            specimens: vec![s],
            ..Dataset::default()
        };
        let err = validate_references(&dataset).unwrap_err();
        assert!(matches!(
            err,
            BackupError::DanglingReference { value: 42, target: "species", .. }
        ));
    }

    #[test]
    fn second_graveyard_entry_is_rejected() {
        let dataset = Dataset {
            specimens: vec![specimen(1), specimen(2)],
            graveyard_entries: vec![grave(1, 1), grave(2, 2), grave(3, 1)],
            ..Dataset::default()
        };
        let err = validate_references(&dataset).unwrap_err();
        assert!(matches!(err, BackupError::DuplicateGraveyardEntry { specimen_id: 1 }));
    }

    #[test]
    fn consistent_batch_passes() {
        let dataset = Dataset {
            specimens: vec![specimen(1)],
            graveyard_entries: vec![grave(1, 1)],
            ..Dataset::default()
        };
        assert!(validate_references(&dataset).is_ok());
    }
}
