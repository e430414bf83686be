//! Row-collection strategies, one per archive generation.
//!
//! [`Layout::detect`] inspects the extracted archive once; everything
//! generation-specific about where rows live stays inside `flat` or
//! `hierarchical`.

mod flat;
mod hierarchical;

use std::path::Path;

use crate::error::BackupError;
use crate::records::RowSet;
use crate::version::{FLAT_REQUIRED, Generation, HIERARCHICAL_REQUIRED};

pub const SPECIES_TABLE: &str = "data/species.csv";
pub const INDEX_TABLE: &str = "data/trees/index.csv";
pub const TREES_DIR: &str = "data/trees";
pub const GENERAL_NOTIFICATIONS_TABLE: &str = "data/general/notifications.csv";
pub const MEDIA_MIRROR_DIR: &str = "media";

/// Per-specimen folder contents.
pub const OVERVIEW_FILE: &str = "overview.csv";
pub const UPDATES_FILE: &str = "updates.csv";
pub const MEASUREMENTS_FILE: &str = "measurements.csv";
pub const PHOTOS_FILE: &str = "photos.csv";
pub const NOTIFICATIONS_FILE: &str = "notifications.csv";
pub const GRAVEYARD_FILE: &str = "graveyard.csv";
pub const ACCOLADES_FILE: &str = "accolades.csv";
pub const PHOTOS_DIR: &str = "photos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Flat,
    Hierarchical,
}

impl Layout {
    /// Pick a strategy from what is actually on disk under `root`.
    ///
    /// The index table selects the hierarchical strategy regardless of the
    /// declared version. Otherwise every flat table must be present.
    ///
    /// # Errors
    ///
    /// `BackupError::MissingEntries` listing every absent table.
    pub fn detect(root: &Path) -> Result<Self, BackupError> {
        if root.join(INDEX_TABLE).is_file() {
            missing(root, &HIERARCHICAL_REQUIRED)?;
            return Ok(Self::Hierarchical);
        }
        missing(root, &FLAT_REQUIRED)?;
        Ok(Self::Flat)
    }

    #[must_use]
    pub const fn generation(self) -> Generation {
        match self {
            Self::Flat => Generation::Flat,
            Self::Hierarchical => Generation::Hierarchical,
        }
    }

    /// Load every table into untyped rows, each tagged with its owner.
    ///
    /// # Errors
    ///
    /// Propagates table read errors; the hierarchical strategy also fails
    /// with `MissingSpecimenFolder` or `UnsafePath` for a bad index row.
    pub fn collect_rows(self, root: &Path) -> Result<RowSet, BackupError> {
        match self {
            Self::Flat => flat::collect_rows(root),
            Self::Hierarchical => hierarchical::collect_rows(root),
        }
    }
}

fn missing(root: &Path, required: &[&str]) -> Result<(), BackupError> {
    let mut absent: Vec<String> = required
        .iter()
        .filter(|entry| !root.join(entry).is_file())
        .map(|entry| (*entry).to_string())
        .collect();
    if absent.is_empty() {
        return Ok(());
    }
    absent.sort();
    Err(BackupError::MissingEntries(absent))
}
