//! Partition types
//!
//! Defines the partition key of the processed layer and the per-partition
//! write result.

use std::fmt;

/// Column the processed layer is partitioned by
pub const PARTITION_COLUMN: &str = "order_date";

/// Directory value used for records without an `order_date`
pub const DEFAULT_PARTITION: &str = "__HIVE_DEFAULT_PARTITION__";

/// File name of the single data file inside each partition directory
pub const PARTITION_FILE: &str = "part-00000.parquet";

/// Partition a normalized record belongs to
///
/// Dated partitions order before the sentinel, and by date among themselves,
/// so iteration over a sorted map is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PartitionKey {
    /// A parsed `YYYY-MM-DD` order date
    Date(String),
    /// No parsable `created_at`
    Unknown,
}

impl PartitionKey {
    /// Key for an optional order date
    pub fn from_order_date(order_date: Option<&str>) -> Self {
        match order_date {
            Some(date) => Self::Date(date.to_string()),
            None => Self::Unknown,
        }
    }

    /// Directory name, e.g. `order_date=2025-11-15`
    pub fn dir_name(&self) -> String {
        format!("{PARTITION_COLUMN}={}", self.value())
    }

    /// Path of the partition's data file relative to the processed root
    pub fn file_path(&self) -> String {
        format!("{}/{PARTITION_FILE}", self.dir_name())
    }

    fn value(&self) -> &str {
        match self {
            Self::Date(date) => date,
            Self::Unknown => DEFAULT_PARTITION,
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Outcome of writing one partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPartition {
    /// Partition that was written
    pub key: PartitionKey,
    /// Rows in the partition file
    pub rows: usize,
    /// Full path of the written file
    pub path: String,
}
