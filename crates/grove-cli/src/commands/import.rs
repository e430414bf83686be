use anyhow::Context;
use grove_config::GroveConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ImportArgs;
use crate::commands::rejection;
use crate::context::open_engine;
use crate::output::output;

pub async fn run(args: &ImportArgs, config: &GroveConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("import: failed to read {}", args.file.display()))?;

    let engine = open_engine(config).await?;
    let report = engine.import(&bytes).await.map_err(rejection)?;

    output(&report, flags.format)
}
