//! Results returned to export and import callers.

use grove_core::dataset::DatasetCounts;
use grove_core::enums::MediaVariant;
use grove_core::responses::ReconcileReport;
use serde::Serialize;

use crate::version::{Generation, MediaLayout};

/// MIME type of an exported archive.
pub const ARCHIVE_MIME_TYPE: &str = "application/zip";

/// A finished export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedArchive {
    /// `<prefix>_<YYYYMMDDTHHMMSSZ>.zip`
    pub file_name: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    /// Photo files left out of the archive. Empty unless
    /// `backup.report_skipped_media` is set.
    pub skipped_media: Vec<SkippedMedia>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedMedia {
    pub photo_id: i64,
    pub variant: MediaVariant,
    pub path: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Absolute, escaping, or empty after normalization.
    UnsafePath,
    /// No file at the resolved location.
    NotFound,
    /// The file exists but could not be read.
    Unreadable,
}

/// A finished import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Declared version string from the archive (or the default).
    pub version: String,
    pub generation: Generation,
    pub media_layout: MediaLayout,
    pub counts: DatasetCounts,
    pub media_files: u64,
    pub reconcile: ReconcileReport,
}
