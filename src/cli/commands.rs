//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Order lakehouse batch pipeline
#[derive(Parser, Debug)]
#[command(name = "order-lakehouse")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Source overrides, shared by every command that reads raw objects
    #[command(flatten)]
    pub source: RunArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the processed and golden layers from raw extracts
    Run,

    /// List the raw objects a run would ingest
    List,

    /// Print the effective configuration as YAML
    Config,
}

/// Flags overriding the configuration file
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Source bucket
    #[arg(long, global = true)]
    pub bucket: Option<String>,

    /// Source key prefix
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    /// S3-compatible endpoint URL
    #[arg(long, global = true, conflicts_with = "local_source")]
    pub endpoint: Option<String>,

    /// Read raw objects from a local directory (buckets are sub-directories)
    #[arg(long, global = true)]
    pub local_source: Option<PathBuf>,

    /// Processed layer root (local path or cloud URL)
    /// Supports: /path, s3://bucket/path, r2://bucket/path, gs://bucket/path, az://container/path
    #[arg(long, global = true)]
    pub processed: Option<String>,

    /// Golden layer root (local path or cloud URL)
    #[arg(long, global = true)]
    pub golden: Option<String>,

    /// Maximum concurrent raw object fetches
    #[arg(long, global = true)]
    pub fetch_concurrency: Option<usize>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Human-readable output
    Pretty,
}
