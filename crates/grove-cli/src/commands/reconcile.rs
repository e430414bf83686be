use anyhow::Context;
use grove_config::GroveConfig;

use crate::cli::GlobalFlags;
use crate::context::open_db;
use crate::output::output;

pub async fn run(config: &GroveConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let db = open_db(config).await?;
    let report = db
        .reconcile_startup()
        .await
        .context("reconcile: failed to link measurements")?;
    output(&report, flags.format)
}
