//! Backup engine configuration.

use serde::{Deserialize, Serialize};

const fn default_slug_max_length() -> usize {
    32
}

fn default_file_prefix() -> String {
    "backup".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackupConfig {
    /// Return the list of photo files skipped during export to the caller.
    /// Skips are always logged.
    #[serde(default)]
    pub report_skipped_media: bool,

    /// Maximum length of the name slug in per-specimen folder names.
    #[serde(default = "default_slug_max_length")]
    pub slug_max_length: usize,

    /// Export file name prefix: `<prefix>_<timestamp>.zip`.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            report_skipped_media: false,
            slug_max_length: default_slug_max_length(),
            file_prefix: default_file_prefix(),
        }
    }
}
