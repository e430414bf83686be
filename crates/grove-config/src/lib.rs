//! # grove-config
//!
//! Layered configuration loading for Grove using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`GROVE_*` prefix, `__` as separator)
//! 2. Project-level `grove.toml`
//! 3. User-level `~/.config/grove/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `GROVE_MEDIA__ROOT` -> `media.root`,
//! `GROVE_BACKUP__REPORT_SKIPPED_MEDIA` -> `backup.report_skipped_media`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use grove_config::GroveConfig;
//!
//! let config = GroveConfig::load_with_dotenv().expect("config");
//! println!("media root: {}", config.media.root.display());
//! ```

mod backup;
mod database;
mod error;
mod media;

pub use backup::BackupConfig;
pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use media::MediaConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project-local configuration file name.
pub const PROJECT_CONFIG_FILE: &str = "grove.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GroveConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub backup: BackupConfig,
}

impl GroveConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate a config from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can add providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("GROVE_").split("__"))
    }

    /// Check values that serde cannot constrain.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backup.slug_max_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backup.slug_max_length".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.backup.file_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "backup.file_prefix".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.database.path.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("grove").join("config.toml"))
    }
}
