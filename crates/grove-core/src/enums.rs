//! Entity kinds and media variants.
//!
//! All enums use `snake_case` serialization and expose `as_str()` for the
//! string used in SQL table names, archive paths and log fields.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Every record kind managed by the store and exchanged by the backup engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Species,
    Specimen,
    Update,
    Measurement,
    Photo,
    Notification,
    GraveyardEntry,
    Accolade,
}

impl EntityKind {
    /// Deletion order for a wholesale replace: children before parents.
    pub const DELETE_ORDER: [Self; 8] = [
        Self::Accolade,
        Self::Photo,
        Self::Measurement,
        Self::Notification,
        Self::Update,
        Self::GraveyardEntry,
        Self::Specimen,
        Self::Species,
    ];

    /// Insertion order for a wholesale replace: parents before children.
    pub const INSERT_ORDER: [Self; 8] = [
        Self::Species,
        Self::Specimen,
        Self::Update,
        Self::Measurement,
        Self::Photo,
        Self::Notification,
        Self::GraveyardEntry,
        Self::Accolade,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Specimen => "specimen",
            Self::Update => "update",
            Self::Measurement => "measurement",
            Self::Photo => "photo",
            Self::Notification => "notification",
            Self::GraveyardEntry => "graveyard_entry",
            Self::Accolade => "accolade",
        }
    }

    /// SQL table backing this kind.
    ///
    /// Exhaustive, so a new variant must name its table here.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Species => "species",
            Self::Specimen => "specimens",
            Self::Update => "updates",
            Self::Measurement => "measurements",
            Self::Photo => "photos",
            Self::Notification => "notifications",
            Self::GraveyardEntry => "graveyard_entries",
            Self::Accolade => "accolades",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MediaVariant
// ---------------------------------------------------------------------------

/// The two stored renditions of a photo. Each maps to a top-level
/// subdirectory of the media root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaVariant {
    Full,
    Thumbs,
}

impl MediaVariant {
    pub const ALL: [Self; 2] = [Self::Full, Self::Thumbs];

    /// Directory name under the media root.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Thumbs => "thumbs",
        }
    }
}

impl fmt::Display for MediaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_and_insert_orders_cover_every_kind() {
        let mut deleted = EntityKind::DELETE_ORDER.to_vec();
        deleted.sort();
        deleted.dedup();
        let mut inserted = EntityKind::INSERT_ORDER.to_vec();
        inserted.sort();
        inserted.dedup();
        assert_eq!(deleted.len(), 8);
        assert_eq!(deleted, inserted);
    }

    #[test]
    fn species_deleted_last_and_inserted_first() {
        assert_eq!(EntityKind::DELETE_ORDER[7], EntityKind::Species);
        assert_eq!(EntityKind::INSERT_ORDER[0], EntityKind::Species);
        assert_eq!(EntityKind::DELETE_ORDER[0], EntityKind::Accolade);
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&EntityKind::GraveyardEntry).unwrap();
        assert_eq!(json, "\"graveyard_entry\"");
        assert_eq!(EntityKind::GraveyardEntry.table(), "graveyard_entries");
    }

    #[test]
    fn media_variant_dirs() {
        assert_eq!(MediaVariant::Full.as_str(), "full");
        assert_eq!(MediaVariant::Thumbs.to_string(), "thumbs");
    }
}
