//! Archive writer: dataset snapshot plus media in, ZIP bytes out.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Seek, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use grove_config::BackupConfig;
use grove_core::dataset::Dataset;
use grove_core::entities::{
    Accolade, GraveyardEntry, Measurement, Notification, Photo, Specimen, Update,
};
use grove_core::enums::MediaVariant;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::codec::encode_table;
use crate::error::BackupError;
use crate::layout::{
    ACCOLADES_FILE, GENERAL_NOTIFICATIONS_TABLE, GRAVEYARD_FILE, INDEX_TABLE, MEASUREMENTS_FILE,
    NOTIFICATIONS_FILE, OVERVIEW_FILE, PHOTOS_DIR, PHOTOS_FILE, SPECIES_TABLE, TREES_DIR,
    UPDATES_FILE,
};
use crate::media::MediaStore;
use crate::records::{
    ACCOLADE_COLUMNS, GRAVEYARD_COLUMNS, INDEX_COLUMNS, MEASUREMENT_COLUMNS, NOTIFICATION_COLUMNS,
    OVERVIEW_COLUMNS, PHOTO_COLUMNS, SPECIES_COLUMNS, UPDATE_COLUMNS, accolade_row,
    graveyard_row, index_row, measurement_row, notification_row, overview_row, photo_row,
    species_row, update_row,
};
use crate::report::{ExportedArchive, SkipReason, SkippedMedia};
use crate::sanitize::normalize_media_subpath;
use crate::version::{METADATA_ENTRY, Metadata};

/// Placeholder slug for names with no alphanumeric characters.
pub const FALLBACK_SLUG: &str = "tree";

/// Lowercase, collapse every run of non-alphanumerics to one hyphen, trim
/// hyphens, cap at `max_len` characters.
#[must_use]
pub fn slugify(name: &str, max_len: usize) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.trim_end_matches('-').chars().take(max_len).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.chars().take(max_len.max(1)).collect()
    } else {
        slug.to_string()
    }
}

/// `<4-digit zero-padded id>_<slug>`
#[must_use]
pub fn folder_name(id: i64, name: &str, max_len: usize) -> String {
    format!("{id:04}_{}", slugify(name, max_len))
}

/// `<prefix>_<YYYYMMDDTHHMMSSZ>.zip`
#[must_use]
pub fn archive_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}_{}.zip", at.format("%Y%m%dT%H%M%SZ"))
}

fn put<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    bytes: &[u8],
) -> Result<(), BackupError> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file(name, options)?;
    zip.write_all(bytes)
        .map_err(|e| BackupError::io(Path::new(name), e))?;
    tracing::debug!(entry = name, bytes = bytes.len(), "wrote archive entry");
    Ok(())
}

/// Owned rows of one specimen.
#[derive(Default)]
struct Children<'a> {
    updates: Vec<&'a Update>,
    measurements: Vec<&'a Measurement>,
    photos: Vec<&'a Photo>,
    notifications: Vec<&'a Notification>,
    graveyard: Vec<&'a GraveyardEntry>,
    accolades: Vec<&'a Accolade>,
}

fn group_children(dataset: &Dataset) -> HashMap<i64, Children<'_>> {
    let mut by_owner: HashMap<i64, Children<'_>> = HashMap::new();
    for u in &dataset.updates {
        by_owner.entry(u.specimen_id).or_default().updates.push(u);
    }
    for m in &dataset.measurements {
        by_owner.entry(m.specimen_id).or_default().measurements.push(m);
    }
    for p in &dataset.photos {
        by_owner.entry(p.specimen_id).or_default().photos.push(p);
    }
    for n in &dataset.notifications {
        if let Some(owner) = n.specimen_id {
            by_owner.entry(owner).or_default().notifications.push(n);
        }
    }
    for g in &dataset.graveyard_entries {
        by_owner.entry(g.specimen_id).or_default().graveyard.push(g);
    }
    for a in &dataset.accolades {
        by_owner.entry(a.specimen_id).or_default().accolades.push(a);
    }
    by_owner
}

fn sort_notifications(notifications: &mut [&Notification]) {
    notifications.sort_by_key(|n| (n.due_at.is_none(), n.due_at, n.created_at, n.id));
}

/// Writes the current archive generation.
pub struct ArchiveWriter<'a, M> {
    media: &'a M,
    config: &'a BackupConfig,
}

impl<'a, M: MediaStore> ArchiveWriter<'a, M> {
    pub const fn new(media: &'a M, config: &'a BackupConfig) -> Self {
        Self { media, config }
    }

    /// Serialize `dataset` and its media into one archive.
    ///
    /// Missing or unsafe media files are skipped; table failures abort.
    ///
    /// # Errors
    ///
    /// `BackupError::Csv`, `Zip` or `Metadata` if a table or the container
    /// cannot be written.
    pub fn write(
        &self,
        dataset: &Dataset,
        exported_at: DateTime<Utc>,
    ) -> Result<ExportedArchive, BackupError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        let metadata = serde_json::to_vec_pretty(&Metadata::current(exported_at))?;
        put(&mut zip, METADATA_ENTRY, &metadata)?;

        let mut species: Vec<_> = dataset.species.iter().collect();
        species.sort_by_key(|s| s.id);
        let table = encode_table(
            "species",
            &SPECIES_COLUMNS,
            species.iter().map(|s| species_row(s)),
        )?;
        put(&mut zip, SPECIES_TABLE, &table)?;

        let species_by_id = dataset.species_index();
        let update_titles: HashMap<i64, &str> = dataset
            .updates
            .iter()
            .map(|u| (u.id, u.title.as_str()))
            .collect();
        let mut children = group_children(dataset);
        let mut specimens: Vec<&Specimen> = dataset.specimens.iter().collect();
        specimens.sort_by_key(|s| s.id);

        let mut index_rows = Vec::with_capacity(specimens.len());
        let mut skipped = Vec::new();
        let mut media_entries: HashSet<String> = HashSet::new();

        for specimen in specimens {
            let folder = folder_name(specimen.id, &specimen.name, self.config.slug_max_length);
            let dir = format!("{TREES_DIR}/{folder}");
            let sp = specimen.species_id.and_then(|id| species_by_id.get(&id).copied());
            let mut owned = children.remove(&specimen.id).unwrap_or_default();

            let table = encode_table("overview", &OVERVIEW_COLUMNS, [overview_row(specimen, sp)])?;
            put(&mut zip, &format!("{dir}/{OVERVIEW_FILE}"), &table)?;

            owned
                .updates
                .sort_by_key(|u| (u.performed_at.is_none(), u.performed_at, u.id));
            let table = encode_table(
                "updates",
                &UPDATE_COLUMNS,
                owned.updates.iter().map(|u| update_row(u)),
            )?;
            put(&mut zip, &format!("{dir}/{UPDATES_FILE}"), &table)?;

            owned
                .measurements
                .sort_by_key(|m| (m.measured_at.is_none(), m.measured_at, m.id));
            let table = encode_table(
                "measurements",
                &MEASUREMENT_COLUMNS,
                owned.measurements.iter().map(|m| measurement_row(m)),
            )?;
            put(&mut zip, &format!("{dir}/{MEASUREMENTS_FILE}"), &table)?;

            owned.photos.sort_by_key(|p| (p.created_at, p.id));
            let table = encode_table(
                "photos",
                &PHOTO_COLUMNS,
                owned.photos.iter().map(|p| {
                    let title = p.update_id.and_then(|id| update_titles.get(&id).copied());
                    photo_row(p, title)
                }),
            )?;
            put(&mut zip, &format!("{dir}/{PHOTOS_FILE}"), &table)?;

            sort_notifications(&mut owned.notifications);
            let table = encode_table(
                "notifications",
                &NOTIFICATION_COLUMNS,
                owned.notifications.iter().map(|n| notification_row(n)),
            )?;
            put(&mut zip, &format!("{dir}/{NOTIFICATIONS_FILE}"), &table)?;

            let table = encode_table(
                "graveyard",
                &GRAVEYARD_COLUMNS,
                owned.graveyard.iter().take(1).map(|g| graveyard_row(g)),
            )?;
            put(&mut zip, &format!("{dir}/{GRAVEYARD_FILE}"), &table)?;

            owned.accolades.sort_by_key(|a| a.id);
            let table = encode_table(
                "accolades",
                &ACCOLADE_COLUMNS,
                owned.accolades.iter().map(|a| accolade_row(a)),
            )?;
            put(&mut zip, &format!("{dir}/{ACCOLADES_FILE}"), &table)?;

            for photo in &owned.photos {
                for (variant, stored) in [
                    (MediaVariant::Full, &photo.full_path),
                    (MediaVariant::Thumbs, &photo.thumbnail_path),
                ] {
                    match self.read_media(stored, variant) {
                        Ok((subpath, bytes)) => {
                            let name = format!("{dir}/{PHOTOS_DIR}/{variant}/{subpath}");
                            if media_entries.contains(&name) {
                                tracing::debug!(
                                    photo_id = photo.id,
                                    entry = %name,
                                    "photo file already archived"
                                );
                                continue;
                            }
                            put(&mut zip, &name, &bytes)?;
                            media_entries.insert(name);
                        }
                        Err(reason) => {
                            tracing::warn!(
                                photo_id = photo.id,
                                specimen_id = specimen.id,
                                path = %stored,
                                ?reason,
                                "skipped photo file"
                            );
                            skipped.push(SkippedMedia {
                                photo_id: photo.id,
                                variant,
                                path: stored.clone(),
                                reason,
                            });
                        }
                    }
                }
            }

            index_rows.push(index_row(specimen, sp, &folder));
        }

        let table = encode_table("index", &INDEX_COLUMNS, index_rows)?;
        put(&mut zip, INDEX_TABLE, &table)?;

        let mut general: Vec<&Notification> = dataset.general_notifications().collect();
        sort_notifications(&mut general);
        let table = encode_table(
            "notifications",
            &NOTIFICATION_COLUMNS,
            general.iter().map(|n| notification_row(n)),
        )?;
        put(&mut zip, GENERAL_NOTIFICATIONS_TABLE, &table)?;

        let bytes = zip.finish()?.into_inner();
        let file_name = archive_file_name(&self.config.file_prefix, exported_at);
        tracing::info!(
            file_name = %file_name,
            bytes = bytes.len(),
            specimens = dataset.specimens.len(),
            skipped_media = skipped.len(),
            "exported archive"
        );

        if !self.config.report_skipped_media {
            skipped.clear();
        }
        Ok(ExportedArchive {
            file_name,
            bytes,
            skipped_media: skipped,
        })
    }

    /// Resolve one stored media path. Returns the archive subpath (relative
    /// to the variant directory, `/`-separated) and the file bytes.
    fn read_media(
        &self,
        stored: &str,
        variant: MediaVariant,
    ) -> Result<(String, Vec<u8>), SkipReason> {
        let subpath =
            normalize_media_subpath(stored, variant.as_str()).ok_or(SkipReason::UnsafePath)?;
        let source = self
            .media
            .existing_file(Path::new(stored))
            .ok_or(SkipReason::NotFound)?;
        let bytes = std::fs::read(&source).map_err(|_| SkipReason::Unreadable)?;
        let subpath = subpath
            .iter()
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Ok((subpath, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    #[case("Ancient  Pine!!", "ancient-pine")]
    #[case("Juniperus chinensis #3", "juniperus-chinensis-3")]
    #[case("  --Maple--  ", "maple")]
    #[case("ÉLM tree", "lm-tree")]
    #[case("", FALLBACK_SLUG)]
    #[case("!!! ???", FALLBACK_SLUG)]
    fn slugs(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(slugify(name, 32), expected);
    }

    #[test]
    fn slug_is_bounded_and_never_ends_in_hyphen() {
        assert_eq!(slugify("abcd efgh", 5), "abcd");
        assert_eq!(slugify(&"x".repeat(100), 32).len(), 32);
    }

    #[test]
    fn folder_is_zero_padded() {
        assert_eq!(folder_name(7, "Ancient  Pine!!", 32), "0007_ancient-pine");
        assert_eq!(folder_name(12345, "", 32), "12345_tree");
    }

    #[test]
    fn file_name_carries_utc_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 11, 3, 14, 5, 9).unwrap();
        assert_eq!(archive_file_name("backup", at), "backup_20241103T140509Z.zip");
    }
}
