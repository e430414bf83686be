use std::path::PathBuf;

use anyhow::Context;
use grove_backup::report::{ARCHIVE_MIME_TYPE, SkippedMedia};
use grove_config::GroveConfig;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExportArgs;
use crate::commands::rejection;
use crate::context::open_engine;
use crate::output::output;

#[derive(Debug, Serialize)]
struct ExportResponse {
    path: String,
    file_name: String,
    mime_type: &'static str,
    bytes: usize,
    skipped_media: Vec<SkippedMedia>,
}

pub async fn run(args: &ExportArgs, config: &GroveConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let engine = open_engine(config).await?;
    let archive = engine.export().await.map_err(rejection)?;

    let dir = args.out.clone().unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("export: failed to create {}", dir.display()))?;
    let path = dir.join(&archive.file_name);
    std::fs::write(&path, &archive.bytes)
        .with_context(|| format!("export: failed to write {}", path.display()))?;

    output(
        &ExportResponse {
            path: path.to_string_lossy().to_string(),
            file_name: archive.file_name,
            mime_type: ARCHIVE_MIME_TYPE,
            bytes: archive.bytes.len(),
            skipped_media: archive.skipped_media,
        },
        flags.format,
    )
}
