//! # grove-backup
//!
//! Versioned backup and restore for a Grove collection.
//!
//! [`BackupEngine::export`] serializes the whole dataset and its photo
//! files into one ZIP archive. [`BackupEngine::import`] reads an archive of
//! any known generation and replaces the live dataset and media root with
//! it. Import is two-phase: the archive is opened, checked, extracted and
//! parsed in full before the first destructive step.
//!
//! The engine is generic over its two collaborators, a
//! [`DatasetStore`](grove_core::store::DatasetStore) and a
//! [`MediaStore`](media::MediaStore), both passed in by the caller.

pub mod codec;
pub mod error;
pub mod layout;
pub mod media;
pub mod reader;
pub mod records;
pub mod report;
pub mod sanitize;
pub mod version;
pub mod writer;

use chrono::{DateTime, Utc};
use grove_config::BackupConfig;
use grove_core::store::DatasetStore;

use error::BackupError;
use media::MediaStore;
use report::{ExportedArchive, ImportReport};
use writer::ArchiveWriter;

pub struct BackupEngine<S, M> {
    store: S,
    media: M,
    config: BackupConfig,
}

impl<S: DatasetStore, M: MediaStore> BackupEngine<S, M> {
    pub const fn new(store: S, media: M, config: BackupConfig) -> Self {
        Self {
            store,
            media,
            config,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn media(&self) -> &M {
        &self.media
    }

    /// Export the current dataset, stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`Self::export_at`].
    pub async fn export(&self) -> Result<ExportedArchive, BackupError> {
        self.export_at(Utc::now()).await
    }

    /// Export the current dataset, stamped with `exported_at`.
    ///
    /// # Errors
    ///
    /// `Persistence` if the snapshot cannot be read; any table or container
    /// write error. No bytes are returned on failure.
    pub async fn export_at(
        &self,
        exported_at: DateTime<Utc>,
    ) -> Result<ExportedArchive, BackupError> {
        let dataset = self
            .store
            .snapshot()
            .await
            .map_err(|e| BackupError::Persistence {
                action: "read",
                source: Box::new(e),
            })?;
        ArchiveWriter::new(&self.media, &self.config).write(&dataset, exported_at)
    }

    /// Replace the live dataset and media with the archive's contents.
    ///
    /// # Errors
    ///
    /// See [`Self::import_at`].
    pub async fn import(&self, bytes: &[u8]) -> Result<ImportReport, BackupError> {
        self.import_at(bytes, Utc::now()).await
    }

    /// Import, using `now` for required timestamps the archive left empty.
    ///
    /// # Errors
    ///
    /// Any rejection from [`reader::prepare`], in which case nothing has
    /// been written; `Persistence` if the store replace failed and was
    /// rolled back; `MediaRestore` if the dataset was committed but the media
    /// root could not be restored.
    pub async fn import_at(
        &self,
        bytes: &[u8],
        now: DateTime<Utc>,
    ) -> Result<ImportReport, BackupError> {
        let prepared = reader::prepare(bytes, now)?;

        let reconcile = self
            .store
            .replace_all(&prepared.dataset)
            .await
            .map_err(|e| BackupError::Persistence {
                action: "replace",
                source: Box::new(e),
            })?;

        let media_files = prepared
            .restore_media(&self.media)
            .map_err(|e| BackupError::MediaRestore { source: Box::new(e) })?;

        let report = ImportReport {
            version: prepared.version.as_str().to_string(),
            generation: prepared.layout.generation(),
            media_layout: prepared.media_layout(),
            counts: prepared.dataset.counts(),
            media_files,
            reconcile,
        };
        tracing::info!(
            version = %report.version,
            generation = ?report.generation,
            specimens = report.counts.specimens,
            media_files,
            "imported archive"
        );
        Ok(report)
    }
}
