//! Archive reader: validates and parses an archive into an in-memory
//! dataset without touching the live store or media root.
//!
//! Everything that can reject an archive happens in [`prepare`]. Only a
//! fully built, reference-checked [`PreparedImport`] is handed to the
//! destructive steps.

use std::collections::HashSet;
use std::fs;
use std::io::{self, Cursor};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use grove_core::dataset::Dataset;
use tempfile::TempDir;
use zip::ZipArchive;

use crate::error::BackupError;
use crate::layout::{Layout, MEDIA_MIRROR_DIR, PHOTOS_DIR, TREES_DIR};
use crate::media::MediaStore;
use crate::records::validate_references;
use crate::sanitize::safe_entry_path;
use crate::version::{ArchiveVersion, MediaLayout};

/// A parsed archive, extracted to a scratch directory that is removed when
/// this value is dropped.
pub struct PreparedImport {
    pub version: ArchiveVersion,
    pub layout: Layout,
    pub dataset: Dataset,
    scratch: TempDir,
}

/// Open, check, extract and parse an archive.
///
/// # Errors
///
/// - `InvalidContainer` if the bytes are not a ZIP archive
/// - `MissingEntries` if required tables are absent
/// - `UnsafePath` if any entry would escape the scratch directory; nothing
///   has been extracted in that case
/// - `MissingSpecimenFolder`, `MissingField`, `InvalidField`,
///   `DanglingReference`, `DuplicateGraveyardEntry` for bad content
pub fn prepare(bytes: &[u8], now: DateTime<Utc>) -> Result<PreparedImport, BackupError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(BackupError::InvalidContainer)?;

    let version = ArchiveVersion::from_archive(&mut archive);
    tracing::debug!(version = %version, entries = archive.len(), "opened archive");

    let names: HashSet<&str> = archive.file_names().collect();
    let mut missing: Vec<String> = version
        .required_entries()
        .iter()
        .filter(|entry| !names.contains(**entry))
        .map(|entry| (*entry).to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(BackupError::MissingEntries(missing));
    }

    let scratch = extract(&mut archive)?;

    let layout = Layout::detect(scratch.path())?;
    let rows = layout.collect_rows(scratch.path())?;
    let mut dataset = rows.into_dataset(now)?;
    dataset.sort_by_id();
    validate_references(&dataset)?;

    tracing::debug!(
        ?layout,
        counts = ?dataset.counts(),
        "parsed archive"
    );
    Ok(PreparedImport {
        version,
        layout,
        dataset,
        scratch,
    })
}

/// Check every entry name, then extract all of them into a fresh scratch
/// directory.
fn extract<R: io::Read + io::Seek>(archive: &mut ZipArchive<R>) -> Result<TempDir, BackupError> {
    let mut entries: Vec<(usize, PathBuf)> = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        entries.push((i, safe_entry_path(entry.name())?));
    }

    let scratch = tempfile::Builder::new()
        .prefix("grove-import-")
        .tempdir()
        .map_err(|e| BackupError::io(std::env::temp_dir(), e))?;

    for (i, relative) in entries {
        if relative.as_os_str().is_empty() {
            continue;
        }
        let mut entry = archive.by_index(i)?;
        let target = scratch.path().join(&relative);
        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|e| BackupError::io(&target, e))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| BackupError::io(parent, e))?;
        }
        let mut out = fs::File::create(&target).map_err(|e| BackupError::io(&target, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| BackupError::io(&target, e))?;
    }
    Ok(scratch)
}

impl PreparedImport {
    #[must_use]
    pub const fn media_layout(&self) -> MediaLayout {
        self.version.media_layout()
    }

    /// Replace the live media directory with the archive's media.
    ///
    /// The root is deleted, repopulated from per-specimen photo trees
    /// (2.1 and later) or the flat `media/` mirror (older), and always ends
    /// up with `full/` and `thumbs/` present. Returns the number of files
    /// copied.
    ///
    /// # Errors
    ///
    /// `BackupError::Io` if the root cannot be cleared or a copy fails.
    pub fn restore_media<M: MediaStore>(&self, media: &M) -> Result<u64, BackupError> {
        media.clear()?;

        let mut copied = 0;
        match self.media_layout() {
            MediaLayout::PerSpecimen => {
                let trees = self.scratch.path().join(TREES_DIR);
                if trees.is_dir() {
                    let mut dirs: Vec<PathBuf> = fs::read_dir(&trees)
                        .map_err(|e| BackupError::io(&trees, e))?
                        .filter_map(Result::ok)
                        .map(|entry| entry.path().join(PHOTOS_DIR))
                        .filter(|photos| photos.is_dir())
                        .collect();
                    dirs.sort();
                    for photos in dirs {
                        copied += media.copy_tree(&photos)?;
                    }
                }
            }
            MediaLayout::FlatMirror => {
                let mirror = self.scratch.path().join(MEDIA_MIRROR_DIR);
                if mirror.is_dir() {
                    copied += media.copy_tree(&mirror)?;
                }
            }
        }

        media.ensure_default_dirs()?;
        tracing::debug!(copied, root = %media.root().display(), "restored media");
        Ok(copied)
    }
}
