//! Pipeline stage and run summary types

use serde::Serialize;
use std::fmt;

/// Stage of a pipeline run
///
/// A run moves through these in order. After `Ready` the processed write and
/// the dedup/golden branch run concurrently. Any error ends the run in the
/// stage that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Listing,
    Fetching,
    Parsing,
    Normalizing,
    Ready,
    WritingProcessed,
    Deduplicating,
    WritingGolden,
    Done,
}

impl PipelineStage {
    /// Stage name as logged
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Listing => "listing",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Normalizing => "normalizing",
            Self::Ready => "ready",
            Self::WritingProcessed => "writing_processed",
            Self::Deduplicating => "deduplicating",
            Self::WritingGolden => "writing_golden",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Raw objects read
    pub objects: usize,
    /// Records after concatenation and normalization
    pub records: usize,
    /// Records whose `created_at` did not parse
    pub unparsed_timestamps: usize,
    /// Processed partitions written
    pub partitions: usize,
    /// Rows in `fact_orders`
    pub fact_orders: usize,
    /// Rows in `dim_customers`
    pub dim_customers: usize,
    /// Rows in `dim_products`
    pub dim_products: usize,
    /// Every file written, processed layer first
    pub files: Vec<String>,
    /// Wall-clock duration of the run
    pub elapsed_ms: u64,
}
