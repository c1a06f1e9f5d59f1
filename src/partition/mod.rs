//! Processed layer partitioning
//!
//! Normalized records are grouped by `order_date` into Hive-style
//! directories, one Parquet file per directory:
//!
//! ```text
//! processed/
//!   order_date=2025-11-15/part-00000.parquet
//!   order_date=2025-11-16/part-00000.parquet
//!   order_date=__HIVE_DEFAULT_PARTITION__/part-00000.parquet
//! ```
//!
//! Records whose `created_at` did not parse all land in the
//! `__HIVE_DEFAULT_PARTITION__` directory with a null `order_date`.

mod types;
mod writer;

pub use types::{
    PartitionKey, WrittenPartition, DEFAULT_PARTITION, PARTITION_COLUMN, PARTITION_FILE,
};
pub use writer::{partition_records, PartitionedWriter};

#[cfg(test)]
mod tests;
