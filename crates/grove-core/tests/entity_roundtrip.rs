//! Serde roundtrip tests for entity types and the dataset snapshot.

use chrono::{NaiveDate, TimeZone, Utc};
use grove_core::dataset::Dataset;
use grove_core::entities::*;
use grove_core::responses::ReconcileReport;
use pretty_assertions::assert_eq;

macro_rules! roundtrip {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(recovered, val, "serde roundtrip failed for {}", stringify!($ty));
        }
    };
}

roundtrip!(
    specimen_roundtrip,
    Specimen,
    Specimen {
        id: 7,
        name: "Ancient Pine".into(),
        species_id: Some(2),
        acquisition_date: NaiveDate::from_ymd_opt(2019, 4, 12),
        origin_date: None,
        location: Some("Bench 3".into()),
        notes: None,
        development_stage: Some("refinement".into()),
        status: "active".into(),
        created_at: Utc.with_ymd_and_hms(2020, 1, 1, 8, 0, 0).unwrap(),
        updated_at: Utc.with_ymd_and_hms(2021, 6, 1, 8, 0, 0).unwrap(),
    }
);

roundtrip!(
    measurement_roundtrip,
    Measurement,
    Measurement {
        id: 3,
        specimen_id: 7,
        update_id: Some(11),
        measured_at: Some(Utc.with_ymd_and_hms(2022, 5, 5, 12, 30, 0).unwrap()),
        height_cm: Some(42.5),
        trunk_diameter_cm: None,
        canopy_width_cm: Some(30.0),
        notes: Some("after pruning".into()),
        created_at: Utc::now(),
    }
);

roundtrip!(
    notification_roundtrip,
    Notification,
    Notification {
        id: 1,
        specimen_id: None,
        title: "Fertilize".into(),
        message: "Spring feeding".into(),
        category: Some("care".into()),
        due_at: None,
        read: true,
        created_at: Utc::now(),
    }
);

roundtrip!(
    reconcile_report_roundtrip,
    ReconcileReport,
    ReconcileReport {
        measurements_removed: 2,
        photos_unlinked: 1,
        ..ReconcileReport::default()
    }
);

#[test]
fn empty_dataset_roundtrip() {
    let dataset = Dataset::default();
    let json = serde_json::to_string(&dataset).unwrap();
    let recovered: Dataset = serde_json::from_str(&json).unwrap();
    assert_eq!(recovered, dataset);
    assert!(recovered.is_empty());
}

#[test]
fn reconcile_report_totals() {
    let report = ReconcileReport {
        measurements_removed: 1,
        measurements_deduplicated: 1,
        photos_unlinked: 1,
        accolades_unlinked: 1,
        updates_synthesized: 1,
    };
    assert_eq!(report.total(), 5);
    assert!(!report.is_clean());
    assert!(ReconcileReport::default().is_clean());
}
