use anyhow::Context;
use grove_backup::BackupEngine;
use grove_backup::media::LocalMediaStore;
use grove_config::GroveConfig;
use grove_db::GroveDb;

use crate::cli::GlobalFlags;

pub type Engine = BackupEngine<GroveDb, LocalMediaStore>;

/// Load layered config, then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<GroveConfig> {
    let mut config = GroveConfig::load_with_dotenv().context("failed to load grove config")?;
    if let Some(path) = &flags.database {
        config.database.path.clone_from(path);
    }
    if let Some(root) = &flags.media_root {
        config.media.root.clone_from(root);
    }
    config.validate().context("invalid grove config")?;
    Ok(config)
}

pub async fn open_db(config: &GroveConfig) -> anyhow::Result<GroveDb> {
    let db = GroveDb::open_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database '{}'", config.database.path))?;
    if let Some(report) = db.startup_reconcile() {
        tracing::debug!(?report, "startup reconciliation ran");
    }
    Ok(db)
}

pub async fn open_engine(config: &GroveConfig) -> anyhow::Result<Engine> {
    let db = open_db(config).await?;
    Ok(BackupEngine::new(
        db,
        LocalMediaStore::new(config.media.root.clone()),
        config.backup.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_in(dir: &std::path::Path) -> GroveConfig {
        let mut config = GroveConfig::default();
        config.database.path = dir.join("grove.db").to_string_lossy().to_string();
        config.media.root = dir.join("media");
        config
    }

    #[tokio::test]
    async fn fresh_database_exports_and_reimports() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let engine = open_engine(&config).await.unwrap();
        let archive = engine.export().await.unwrap();
        assert!(archive.file_name.ends_with(".zip"));

        let report = engine.import(&archive.bytes).await.unwrap();
        assert_eq!(report.version, "2.1");
        assert_eq!(report.counts, grove_core::dataset::DatasetCounts::default());
        assert!(dir.path().join("media").join("full").is_dir());
    }
}
