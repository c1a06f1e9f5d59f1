//! CLI module
//!
//! Command-line interface for the batch pipeline.
//!
//! # Commands
//!
//! - `run` - Ingest raw extracts and rebuild the processed and golden layers
//! - `list` - List the raw objects a run would ingest
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, RunArgs};
pub use runner::Runner;
