// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Order Lakehouse
//!
//! A batch pipeline that turns raw order extracts in an object store into
//! an analytical lakehouse: a date-partitioned processed layer and a golden
//! layer with one fact table and two dimensions.
//!
//! ## Features
//!
//! - **Object store ingestion**: S3-compatible servers or a local directory,
//!   with bounded concurrent fetches and retry-with-backoff
//! - **All-or-nothing runs**: an empty listing, a malformed extract or an
//!   uncastable field fails the run before any output is touched
//! - **Deterministic output**: one Parquet file per partition or table,
//!   byte-identical across runs on the same input
//! - **Explicit deduplication**: latest `updated_at` wins, then first seen
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use order_lakehouse::{config::PipelineConfig, pipeline::Pipeline, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = PipelineConfig::from_file("pipeline.yaml")?;
//!     let summary = Pipeline::from_config(config)?.run().await?;
//!     println!("{} fact rows", summary.fact_orders);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                          Pipeline                                │
//! │  Listing → Fetching → Parsing → Normalizing → Ready → Done       │
//! └──────────────────────────────────────────────────────────────────┘
//!                                 │
//! ┌──────────┬──────────┬─────────┴───┬─────────────┬───────────────┐
//! │  Store   │  Ingest  │  Normalize  │  Partition  │ Dedup/Output  │
//! ├──────────┼──────────┼─────────────┼─────────────┼───────────────┤
//! │ S3       │ Envelope │ qty / price │ order_date= │ fact_orders   │
//! │ Local    │ Ordered  │ total_price │ Hive dirs   │ dim_customers │
//! │ Retry    │ fetch    │ order_ts    │ Parquet     │ dim_products  │
//! └──────────┴──────────┴─────────────┴─────────────┴───────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document record field types before 1.0 release

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Pipeline configuration
pub mod config;

/// Object store client and retry wrapper
pub mod store;

/// Raw extract ingestion
pub mod ingest;

/// Record casting and enrichment
pub mod normalize;

/// Processed layer partitioning
pub mod partition;

/// Fact and dimension tables
pub mod dedup;

/// Arrow/Parquet output
pub mod output;

/// Whole-run orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

pub use config::PipelineConfig;
pub use pipeline::{Pipeline, PipelineStage, RunSummary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
