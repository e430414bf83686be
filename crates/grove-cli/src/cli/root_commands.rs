use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Write a backup archive of the whole collection.
    Export(ExportArgs),
    /// Replace the collection with the contents of a backup archive.
    Import(ImportArgs),
    /// Give every measurement an update on its own specimen.
    Reconcile,
}

#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    /// Directory to write the archive into (defaults to the current directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct ImportArgs {
    /// Archive to import
    pub file: PathBuf,
}
