//! Archive version detection.
//!
//! The declared version comes from `metadata.json`; it decides which entries
//! must be present and where media lives. The row-collection strategy is
//! chosen separately, by structure (see [`crate::layout::Layout::detect`]).

use std::fmt;
use std::io::{Read, Seek};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version written by this engine.
pub const CURRENT_VERSION: &str = "2.1";

/// Version assumed when the descriptor is absent or unreadable.
pub const DEFAULT_VERSION: &str = "1.0";

pub const METADATA_ENTRY: &str = "metadata.json";

/// Entries a hierarchical archive must contain.
pub const HIERARCHICAL_REQUIRED: [&str; 2] = ["data/species.csv", "data/trees/index.csv"];

/// Entries a flat archive must contain.
pub const FLAT_REQUIRED: [&str; 7] = [
    "data/species.csv",
    "data/bonsai.csv",
    "data/measurements.csv",
    "data/updates.csv",
    "data/photos.csv",
    "data/notifications.csv",
    "data/graveyard_entries.csv",
];

/// Root metadata descriptor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    pub version: String,
}

impl Metadata {
    #[must_use]
    pub fn current(exported_at: DateTime<Utc>) -> Self {
        Self {
            exported_at: Some(exported_at),
            version: CURRENT_VERSION.to_string(),
        }
    }
}

/// Numeric `major.minor` view of a version string.
///
/// Each component is its leading digits; anything else is ignored and a
/// missing component counts as 0, so `"2.1-beta"` is 2.1 and `"10"` is 10.0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveVersion {
    raw: String,
    major: u32,
    minor: u32,
}

impl ArchiveVersion {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.trim().split('.');
        let mut component = || {
            parts.next().map_or(0, |part| {
                let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
                digits.parse().unwrap_or(0)
            })
        };
        let major = component();
        let minor = component();
        Self {
            raw: raw.to_string(),
            major,
            minor,
        }
    }

    /// Read the declared version from the container, defaulting to
    /// [`DEFAULT_VERSION`] when the descriptor is missing or unparsable.
    pub fn from_archive<R: Read + Seek>(archive: &mut zip::ZipArchive<R>) -> Self {
        let Ok(mut file) = archive.by_name(METADATA_ENTRY) else {
            return Self::parse(DEFAULT_VERSION);
        };
        let mut buffer = Vec::new();
        if let Err(e) = file.read_to_end(&mut buffer) {
            tracing::warn!(error = %e, "unreadable metadata descriptor");
            return Self::parse(DEFAULT_VERSION);
        }
        match serde_json::from_slice::<serde_json::Value>(&buffer) {
            Ok(value) => match value.get("version") {
                Some(serde_json::Value::String(s)) => Self::parse(s),
                Some(serde_json::Value::Number(n)) => Self::parse(&n.to_string()),
                _ => Self::parse(DEFAULT_VERSION),
            },
            Err(e) => {
                tracing::warn!(error = %e, "unparsable metadata descriptor");
                Self::parse(DEFAULT_VERSION)
            }
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn major(&self) -> u32 {
        self.major
    }

    #[must_use]
    pub const fn minor(&self) -> u32 {
        self.minor
    }

    /// `true` if this version is `major.minor` or newer.
    #[must_use]
    pub const fn is_at_least(&self, major: u32, minor: u32) -> bool {
        if self.major == major {
            self.minor >= minor
        } else {
            self.major > major
        }
    }

    /// Family used to pick the required entries.
    #[must_use]
    pub const fn generation(&self) -> Generation {
        if self.major >= 2 {
            Generation::Hierarchical
        } else {
            Generation::Flat
        }
    }

    /// Where this version keeps media inside the archive.
    #[must_use]
    pub const fn media_layout(&self) -> MediaLayout {
        if self.is_at_least(2, 1) {
            MediaLayout::PerSpecimen
        } else {
            MediaLayout::FlatMirror
        }
    }

    /// Top-level entries that must be present for the declared family.
    #[must_use]
    pub const fn required_entries(&self) -> &'static [&'static str] {
        match self.generation() {
            Generation::Hierarchical => &HIERARCHICAL_REQUIRED,
            Generation::Flat => &FLAT_REQUIRED,
        }
    }
}

impl fmt::Display for ArchiveVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Archive table layout generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Generation {
    /// One flat table per kind under `data/`.
    Flat,
    /// Specimen index plus one folder per specimen.
    Hierarchical,
}

/// Where media files are stored inside the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaLayout {
    /// `data/trees/<folder>/photos/{full,thumbs}/...`
    PerSpecimen,
    /// `media/{full,thumbs}/...`
    FlatMirror,
}
