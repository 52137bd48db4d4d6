//! Command-line argument definitions.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Annotate structured content with schema model metadata.
#[derive(Debug, Clone, Parser)]
#[command(name = "loam", version, about)]
pub struct Cli {
    /// Content directory to scan
    #[arg(long, default_value = "content")]
    pub dir: PathBuf,

    /// Schema document (YAML); a missing file means pass-through mode
    #[arg(long, default_value = "loam.yaml")]
    pub schema: PathBuf,

    /// Project root used for relProjectPath metadata
    #[arg(long)]
    pub project_root: Option<PathBuf>,

    /// Source instance name written into object metadata
    #[arg(long, default_value = "content")]
    pub source_name: String,

    /// Fold schema-less data files into one merged data object
    #[arg(long)]
    pub merge_data: bool,

    /// Log one line per matched object plus the match summary
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full annotated object list as JSON
    Json,
    /// Match counts and diagnostics only
    Summary,
}
