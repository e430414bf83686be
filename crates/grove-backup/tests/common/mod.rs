#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use grove_backup::BackupEngine;
use grove_backup::media::LocalMediaStore;
use grove_config::BackupConfig;
use grove_core::dataset::Dataset;
use grove_core::entities::{
    Accolade, GraveyardEntry, Measurement, Notification, Photo, Species, Specimen, Update,
};
use grove_db::GroveDb;
use zip::write::SimpleFileOptions;

pub type Engine = BackupEngine<GroveDb, LocalMediaStore>;

pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, 8, 15, 0).unwrap()
}

pub async fn engine(media_root: &Path) -> Engine {
    engine_with(media_root, BackupConfig::default()).await
}

pub async fn engine_with(media_root: &Path, config: BackupConfig) -> Engine {
    let db = GroveDb::open_local(":memory:").await.unwrap();
    BackupEngine::new(db, LocalMediaStore::new(media_root), config)
}

pub fn write_file(root: &Path, rel: &str, body: &[u8]) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

/// Build a ZIP archive from `(name, contents)` pairs.
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(body).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn entry_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
    names.sort();
    names
}

/// Two specimens, one with a full history and one in the graveyard, plus a
/// general reminder.
pub fn sample_dataset() -> Dataset {
    Dataset {
        species: vec![Species {
            id: 1,
            common_name: "Japanese Black Pine".into(),
            scientific_name: Some("Pinus thunbergii".into()),
            description: Some("Two-needle pine, \"candles\" in spring".into()),
            care_instructions: Some("Full sun,\nfree-draining soil".into()),
            tree_count: 1,
            created_at: at(1),
            updated_at: at(1),
        }],
        specimens: vec![
            Specimen {
                id: 7,
                name: "Ancient  Pine!!".into(),
                species_id: Some(1),
                acquisition_date: NaiveDate::from_ymd_opt(2019, 4, 2),
                origin_date: NaiveDate::from_ymd_opt(1990, 1, 1),
                location: Some("Bench A".into()),
                notes: Some("Collected".into()),
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
        updates: vec![
            Update {
                id: 3,
                specimen_id: 7,
                title: "Repot".into(),
                description: Some("Akadama mix".into()),
                performed_at: Some(at(3)),
                created_at: at(3),
                updated_at: at(3),
            },
            Update {
                id: 4,
                specimen_id: 7,
                title: "Planned wiring".into(),
                description: None,
                performed_at: None,
                created_at: at(4),
                updated_at: at(4),
            },
        ],
        measurements: vec![Measurement {
            id: 5,
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
            id: 6,
            specimen_id: 7,
            update_id: Some(3),
            description: Some("After repot".into()),
            taken_at: Some(at(3)),
            full_path: "full/7/after.jpg".into(),
            thumbnail_path: "thumbs/7/after.jpg".into(),
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
            photo_id: Some(6),
            created_at: at(7),
            updated_at: at(7),
        }],
    }
}

/// Media files matching [`sample_dataset`]'s photo rows.
pub fn seed_sample_media(root: &Path) {
    write_file(root, "full/7/after.jpg", b"full-bytes");
    write_file(root, "thumbs/7/after.jpg", b"thumb-bytes");
}
