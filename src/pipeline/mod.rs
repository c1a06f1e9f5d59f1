//! Whole-run orchestration
//!
//! Ingest, normalize, then write the processed layer and the golden layer
//! side by side. Ingestion must finish before normalization starts, and
//! normalization before either writer starts. Output locations are only
//! touched once normalization has succeeded.

mod orchestrator;
mod types;

pub use orchestrator::Pipeline;
pub use types::{PipelineStage, RunSummary};
