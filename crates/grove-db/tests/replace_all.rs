//! Atomic replacement and snapshot behaviour against an in-memory store.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use grove_core::dataset::Dataset;
use grove_core::entities::{
    Accolade, GraveyardEntry, Measurement, Notification, Photo, Species, Specimen, Update,
};
use grove_core::store::DatasetStore;
use grove_core::enums::EntityKind;
use grove_db::{GroveDb, repos};
use pretty_assertions::assert_eq;

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 9, 30, 0).unwrap()
}

fn sample() -> Dataset {
    Dataset {
        species: vec![Species {
            id: 1,
            common_name: "Japanese Black Pine".into(),
            scientific_name: Some("Pinus thunbergii".into()),
            description: None,
            care_instructions: Some("Full sun".into()),
            tree_count: 1,
            created_at: at(1),
            updated_at: at(1),
        }],
        specimens: vec![
            Specimen {
                id: 7,
                name: "Ancient Pine".into(),
                species_id: Some(1),
                acquisition_date: NaiveDate::from_ymd_opt(2019, 4, 2),
                origin_date: None,
                location: Some("Bench A".into()),
                notes: None,
                development_stage: Some("refinement".into()),
                status: "active".into(),
                created_at: at(1),
                updated_at: at(2),
            },
            Specimen {
                id: 8,
                name: "Lost Maple".into(),
                species_id: None,
                acquisition_date: None,
                origin_date: None,
                location: None,
                notes: None,
                development_stage: None,
                status: "dead".into(),
                created_at: at(1),
                updated_at: at(1),
            },
        ],
        updates: vec![Update {
            id: 3,
            specimen_id: 7,
            title: "Repot".into(),
            description: Some("Akadama mix".into()),
            performed_at: Some(at(3)),
            created_at: at(3),
            updated_at: at(3),
        }],
        measurements: vec![Measurement {
            id: 4,
            specimen_id: 7,
            update_id: Some(3),
            measured_at: Some(at(3)),
            height_cm: Some(41.5),
            trunk_diameter_cm: Some(6.0),
            canopy_width_cm: None,
            notes: None,
            created_at: at(3),
        }],
        photos: vec![Photo {
            id: 5,
            specimen_id: 7,
            update_id: Some(3),
            description: None,
            taken_at: Some(at(3)),
            full_path: "full/7/a.jpg".into(),
            thumbnail_path: "thumbs/7/a.jpg".into(),
            is_primary: true,
            created_at: at(3),
        }],
        notifications: vec![
            Notification {
                id: 1,
                specimen_id: Some(7),
                title: "Water".into(),
                message: "Check moisture".into(),
                category: Some("care".into()),
                due_at: Some(at(5)),
                read: false,
                created_at: at(4),
            },
            Notification {
                id: 2,
                specimen_id: None,
                title: "Order soil".into(),
                message: "Running low".into(),
                category: None,
                due_at: None,
                read: true,
                created_at: at(4),
            },
        ],
        graveyard_entries: vec![GraveyardEntry {
            id: 1,
            specimen_id: 8,
            category: "dead".into(),
            note: Some("Root rot".into()),
            moved_at: at(6),
        }],
        accolades: vec![Accolade {
            id: 1,
            specimen_id: 7,
            title: "Best in show".into(),
            photo_id: Some(5),
            created_at: at(7),
            updated_at: at(7),
        }],
    }
}

#[tokio::test]
async fn replace_then_snapshot_preserves_every_field() {
    let db = GroveDb::open_local(":memory:").await.unwrap();
    let dataset = sample();

    let report = db.replace_all(&dataset).await.unwrap();
    assert!(report.is_clean());

    let snapshot = db.snapshot().await.unwrap();
    assert_eq!(snapshot, dataset);
}

#[tokio::test]
async fn replace_discards_previous_rows() {
    let db = GroveDb::open_local(":memory:").await.unwrap();
    db.replace_all(&sample()).await.unwrap();

    let mut smaller = sample();
    smaller.specimens.truncate(1);
    smaller.graveyard_entries.clear();
    db.replace_all(&smaller).await.unwrap();

    let snapshot = db.snapshot().await.unwrap();
    assert_eq!(snapshot.specimens.len(), 1);
    assert!(snapshot.graveyard_entries.is_empty());
}

#[tokio::test]
async fn failed_replace_leaves_prior_dataset_untouched() {
    let db = GroveDb::open_local(":memory:").await.unwrap();
    db.replace_all(&sample()).await.unwrap();

    let mut broken = sample();
    broken.updates[0].specimen_id = 999;
    let result = db.replace_all(&broken).await;
    assert!(result.is_err(), "dangling specimen reference must fail");

    let snapshot = db.snapshot().await.unwrap();
    assert_eq!(snapshot, sample());

    let counts = sample().counts();
    for (kind, expected) in [
        (EntityKind::Species, counts.species),
        (EntityKind::Specimen, counts.specimens),
        (EntityKind::Update, counts.updates),
        (EntityKind::Measurement, counts.measurements),
        (EntityKind::Photo, counts.photos),
        (EntityKind::Notification, counts.notifications),
        (EntityKind::GraveyardEntry, counts.graveyard_entries),
        (EntityKind::Accolade, counts.accolades),
    ] {
        let stored = repos::count(db.conn(), kind).await.unwrap();
        assert_eq!(stored, expected as u64, "{kind:?} rows after rollback");
    }
}

#[tokio::test]
async fn duplicate_graveyard_entry_is_rejected() {
    let db = GroveDb::open_local(":memory:").await.unwrap();
    let mut dataset = sample();
    let mut second = dataset.graveyard_entries[0].clone();
    second.id = 2;
    dataset.graveyard_entries.push(second);

    assert!(db.replace_all(&dataset).await.is_err());
    assert!(db.snapshot().await.unwrap().is_empty());
}

#[tokio::test]
async fn replace_reconciles_cross_specimen_measurement() {
    let db = GroveDb::open_local(":memory:").await.unwrap();
    let mut dataset = sample();
    dataset.measurements.push(Measurement {
        id: 9,
        specimen_id: 8,
        update_id: Some(3),
        measured_at: None,
        height_cm: Some(12.0),
        trunk_diameter_cm: None,
        canopy_width_cm: None,
        notes: None,
        created_at: at(8),
    });

    let report = db.replace_all(&dataset).await.unwrap();
    assert_eq!(report.measurements_removed, 1);

    let snapshot = db.snapshot().await.unwrap();
    assert_eq!(snapshot.measurements.len(), 1);
    assert_eq!(snapshot.measurements[0].id, 4);
    assert_eq!(snapshot.updates[0].specimen_id, 7);
}

#[tokio::test]
async fn file_backed_database_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grove.db");
    let path = path.to_str().unwrap();

    {
        let db = GroveDb::open_local(path).await.unwrap();
        db.replace_all(&sample()).await.unwrap();
    }

    let reopened = GroveDb::open_local(path).await.unwrap();
    assert!(reopened.startup_reconcile().is_none(), "migrations already applied");
    assert_eq!(reopened.snapshot().await.unwrap(), sample());
}
