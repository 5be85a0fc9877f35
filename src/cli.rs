use chapter_sync::profile::{DEFAULT_SOURCE_URL, DEFAULT_TIMEOUT_SECS};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chapter-sync")]
#[command(about = "Sync catalog videos into the chapter lists of per-subject HTML pages")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Defaults to `sync`
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the subject HTML files
    #[arg(short, long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// Catalog page URL, or a saved copy on disk
    #[arg(short, long, global = true, default_value = DEFAULT_SOURCE_URL)]
    pub source: String,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the catalog and inject new videos into the subject files
    Sync(SyncArgs),

    /// Show how catalog topics map onto chapters without touching any file
    Preview(PreviewArgs),

    /// Verify that every subject file exists and has its markers
    Check,
}

#[derive(Args, Default)]
pub struct SyncArgs {
    /// Report what would be added without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct PreviewArgs {
    /// Write the classification to a JSON file
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    /// List every topic and where it landed
    #[arg(long)]
    pub detailed: bool,
}
