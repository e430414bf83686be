//! Export followed by import into a fresh store and media root.

mod common;

use chrono::TimeZone;
use chrono::Utc;
use common::{engine, engine_with, entry_names, sample_dataset, seed_sample_media};
use grove_backup::media::MediaStore;
use grove_backup::report::SkipReason;
use grove_backup::version::{Generation, MediaLayout};
use grove_config::BackupConfig;
use grove_core::store::DatasetStore;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn import_of_export_reproduces_dataset_and_media() {
    let src_media = tempfile::tempdir().unwrap();
    seed_sample_media(src_media.path());
    let source = engine(src_media.path()).await;
    source.store().replace_all(&sample_dataset()).await.unwrap();

    let exported = source.export().await.unwrap();
    assert!(exported.skipped_media.is_empty());

    let dst_media = tempfile::tempdir().unwrap();
    let target = engine(dst_media.path()).await;
    let report = target.import(&exported.bytes).await.unwrap();

    assert_eq!(report.version, "2.1");
    assert_eq!(report.generation, Generation::Hierarchical);
    assert_eq!(report.media_layout, MediaLayout::PerSpecimen);
    assert_eq!(report.media_files, 2);
    assert!(report.reconcile.is_clean());

    let restored = target.store().snapshot().await.unwrap();
    assert_eq!(restored, sample_dataset());

    for photo in &restored.photos {
        let full = dst_media.path().join(&photo.full_path);
        let thumb = dst_media.path().join(&photo.thumbnail_path);
        assert_eq!(std::fs::read(full).unwrap(), b"full-bytes");
        assert_eq!(std::fs::read(thumb).unwrap(), b"thumb-bytes");
    }
}

#[tokio::test]
async fn export_layout_uses_padded_slug_folders() {
    let media = tempfile::tempdir().unwrap();
    seed_sample_media(media.path());
    let engine = engine(media.path()).await;
    engine.store().replace_all(&sample_dataset()).await.unwrap();

    let at = Utc.with_ymd_and_hms(2024, 11, 3, 14, 5, 9).unwrap();
    let exported = engine.export_at(at).await.unwrap();
    assert_eq!(exported.file_name, "backup_20241103T140509Z.zip");

    let names = entry_names(&exported.bytes);
    for expected in [
        "metadata.json",
        "data/species.csv",
        "data/trees/index.csv",
        "data/general/notifications.csv",
        "data/trees/0007_ancient-pine/overview.csv",
        "data/trees/0007_ancient-pine/updates.csv",
        "data/trees/0007_ancient-pine/measurements.csv",
        "data/trees/0007_ancient-pine/photos.csv",
        "data/trees/0007_ancient-pine/notifications.csv",
        "data/trees/0007_ancient-pine/graveyard.csv",
        "data/trees/0007_ancient-pine/accolades.csv",
        "data/trees/0007_ancient-pine/photos/full/7/after.jpg",
        "data/trees/0007_ancient-pine/photos/thumbs/7/after.jpg",
        "data/trees/0008_lost-maple/graveyard.csv",
    ] {
        assert!(names.iter().any(|n| n == expected), "missing {expected}");
    }
}

#[tokio::test]
async fn importing_twice_yields_the_same_state() {
    let src_media = tempfile::tempdir().unwrap();
    seed_sample_media(src_media.path());
    let source = engine(src_media.path()).await;
    source.store().replace_all(&sample_dataset()).await.unwrap();
    let exported = source.export().await.unwrap();

    let dst_media = tempfile::tempdir().unwrap();
    let target = engine(dst_media.path()).await;
    target.import(&exported.bytes).await.unwrap();
    let first = target.store().snapshot().await.unwrap();

    target.import(&exported.bytes).await.unwrap();
    let second = target.store().snapshot().await.unwrap();

    assert_eq!(first, second);
    assert!(dst_media.path().join("full/7/after.jpg").is_file());
}

#[tokio::test]
async fn missing_media_is_skipped_and_reported_when_enabled() {
    let media = tempfile::tempdir().unwrap();
    common::write_file(media.path(), "full/7/after.jpg", b"full-bytes");
    let mut dataset = sample_dataset();
    dataset.photos[0].thumbnail_path = "/etc/thumb.jpg".into();

    let config = BackupConfig {
        report_skipped_media: true,
        ..BackupConfig::default()
    };
    let engine = engine_with(media.path(), config).await;
    engine.store().replace_all(&dataset).await.unwrap();

    let exported = engine.export().await.unwrap();
    assert_eq!(exported.skipped_media.len(), 1);
    assert_eq!(exported.skipped_media[0].photo_id, 6);
    assert_eq!(exported.skipped_media[0].reason, SkipReason::UnsafePath);

    let names = entry_names(&exported.bytes);
    assert!(names.iter().any(|n| n.ends_with("photos/full/7/after.jpg")));
    assert!(!names.iter().any(|n| n.contains("photos/thumbs/")));
}

#[tokio::test]
async fn skipped_media_is_only_logged_by_default() {
    let media = tempfile::tempdir().unwrap();
    let engine = engine(media.path()).await;
    engine.store().replace_all(&sample_dataset()).await.unwrap();

    let exported = engine.export().await.unwrap();
    assert!(exported.skipped_media.is_empty());
    assert!(!entry_names(&exported.bytes).iter().any(|n| n.contains("/photos/")));
}

#[tokio::test]
async fn empty_dataset_round_trips() {
    let media = tempfile::tempdir().unwrap();
    let engine = engine(media.path()).await;
    let exported = engine.export().await.unwrap();

    let report = engine.import(&exported.bytes).await.unwrap();
    assert_eq!(report.counts, grove_core::dataset::DatasetCounts::default());
    assert!(media.path().join("full").is_dir());
    assert!(media.path().join("thumbs").is_dir());
}

#[tokio::test]
async fn photos_sharing_a_file_export_it_once() {
    let src_media = tempfile::tempdir().unwrap();
    seed_sample_media(src_media.path());
    let mut dataset = sample_dataset();
    let mut twin = dataset.photos[0].clone();
    twin.id = 99;
    twin.is_primary = false;
    dataset.photos.push(twin);

    let source = engine(src_media.path()).await;
    source.store().replace_all(&dataset).await.unwrap();
    let exported = source.export().await.unwrap();
    assert!(exported.skipped_media.is_empty());

    let names = entry_names(&exported.bytes);
    let full = "data/trees/0007_ancient-pine/photos/full/7/after.jpg";
    assert_eq!(names.iter().filter(|n| *n == full).count(), 1);

    let dst_media = tempfile::tempdir().unwrap();
    let target = engine(dst_media.path()).await;
    let report = target.import(&exported.bytes).await.unwrap();
    assert_eq!(report.counts.photos, 2);
    assert_eq!(report.media_files, 2);
    assert_eq!(target.media().root(), dst_media.path());

    let restored = target.store().snapshot().await.unwrap();
    assert_eq!(restored, dataset);
    for photo in &restored.photos {
        let full = target.media().root().join(&photo.full_path);
        assert_eq!(std::fs::read(full).unwrap(), b"full-bytes");
    }
}

#[tokio::test]
async fn whitespace_in_text_fields_survives_round_trip() {
    let media = tempfile::tempdir().unwrap();
    let mut dataset = sample_dataset();
    dataset.specimens[0].notes = Some("   ".into());
    dataset.specimens[0].location = Some("  Bench A ".into());
    dataset.updates[1].title = "  ".into();
    dataset.notifications[1].message = " trailing space ".into();

    let source = engine(media.path()).await;
    source.store().replace_all(&dataset).await.unwrap();
    let exported = source.export().await.unwrap();

    let dst_media = tempfile::tempdir().unwrap();
    let target = engine(dst_media.path()).await;
    target.import(&exported.bytes).await.unwrap();

    let restored = target.store().snapshot().await.unwrap();
    assert_eq!(restored.specimens[0].notes.as_deref(), Some("   "));
    assert_eq!(restored, dataset);
}
