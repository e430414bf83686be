use grove_backup::error::BackupError;
use grove_config::GroveConfig;

use crate::cli::{Commands, GlobalFlags};

pub mod export;
pub mod import;
pub mod reconcile;

pub async fn dispatch(
    command: Commands,
    config: &GroveConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Export(args) => export::run(&args, config, flags).await,
        Commands::Import(args) => import::run(&args, config, flags).await,
        Commands::Reconcile => reconcile::run(config, flags).await,
    }
}

/// Prefix an engine error with its rejection class.
pub fn rejection(error: BackupError) -> anyhow::Error {
    anyhow::anyhow!("{}: {error}", error.failure_class())
}
