//! Error types for grove-backup.

use std::path::PathBuf;

use thiserror::Error;

/// The two rejection classes an import caller distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The bytes are not a readable archive container.
    MalformedContainer,
    /// The container opened but its content was rejected, or the store failed.
    InvalidContent,
}

impl FailureClass {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedContainer => "malformed-container",
            Self::InvalidContent => "invalid-content",
        }
    }
}

impl std::fmt::Display for FailureClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from export and import.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The archive bytes cannot be opened as a ZIP container.
    #[error("Invalid ZIP archive: {0}")]
    InvalidContainer(#[source] zip::result::ZipError),

    /// Required tables are absent. Names are sorted.
    #[error("Archive is missing required files: {}", .0.join(", "))]
    MissingEntries(Vec<String>),

    /// An indexed specimen has no folder in the archive.
    #[error("Archive is missing data for specimen {specimen_id}: {folder}")]
    MissingSpecimenFolder { specimen_id: i64, folder: String },

    /// An entry name is absolute or contains a parent-directory segment.
    #[error("Archive contains unsafe path: {0}")]
    UnsafePath(String),

    /// A required value is empty or its column is absent.
    #[error("Missing required value for {field}")]
    MissingField { field: String },

    /// A value could not be parsed into its field type.
    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    /// A foreign key does not resolve inside the imported batch.
    #[error("{field} = {value} does not match any {target} in the archive")]
    DanglingReference {
        field: String,
        value: i64,
        target: &'static str,
    },

    /// More than one graveyard entry for one specimen.
    #[error("Specimen {specimen_id} has more than one graveyard entry")]
    DuplicateGraveyardEntry { specimen_id: i64 },

    /// The dataset store failed; a replace has been rolled back.
    #[error("Failed to {action} dataset: {source}")]
    Persistence {
        action: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The store now holds the imported dataset, but the media root was
    /// left partially restored and needs recovery.
    #[error("Dataset was replaced but restoring the media root failed: {source}")]
    MediaRestore {
        #[source]
        source: Box<BackupError>,
    },

    /// Filesystem failure at a known path.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Table encoding or decoding failed.
    #[error("Table {table}: {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// Writing or reading an entry of an opened container failed.
    #[error("Archive entry error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The metadata descriptor could not be encoded.
    #[error("Metadata error: {0}")]
    Metadata(#[from] serde_json::Error),
}

impl BackupError {
    /// Which rejection class this error belongs to.
    #[must_use]
    pub const fn failure_class(&self) -> FailureClass {
        match self {
            Self::InvalidContainer(_) => FailureClass::MalformedContainer,
            _ => FailureClass::InvalidContent,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_container_errors_are_malformed() {
        let err = BackupError::InvalidContainer(zip::result::ZipError::InvalidArchive(
            "bad magic".into(),
        ));
        assert_eq!(err.failure_class(), FailureClass::MalformedContainer);

        let err = BackupError::MissingEntries(vec!["data/species.csv".into()]);
        assert_eq!(err.failure_class(), FailureClass::InvalidContent);
    }

    #[test]
    fn media_restore_failure_says_dataset_was_replaced() {
        let err = BackupError::MediaRestore {
            source: Box::new(BackupError::io(
                "/srv/media",
                std::io::Error::other("read-only file system"),
            )),
        };
        assert_eq!(
            err.to_string(),
            "Dataset was replaced but restoring the media root failed: \
             I/O error at /srv/media: read-only file system"
        );
    }

    #[test]
    fn missing_entries_lists_every_name() {
        let err = BackupError::MissingEntries(vec![
            "data/bonsai.csv".into(),
            "data/photos.csv".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Archive is missing required files: data/bonsai.csv, data/photos.csv"
        );
    }
}
