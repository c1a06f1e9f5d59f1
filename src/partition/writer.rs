//! Partitioned writer for the processed layer

use super::types::{PartitionKey, WrittenPartition};
use crate::error::{Error, Result};
use crate::normalize::NormalizedOrderRecord;
use crate::output::{encode_parquet, processed_batch, OutputDestination, ParquetWriterConfig};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Group records by partition key, keeping input order within each group
pub fn partition_records(
    records: &[NormalizedOrderRecord],
) -> BTreeMap<PartitionKey, Vec<&NormalizedOrderRecord>> {
    let mut partitions: BTreeMap<PartitionKey, Vec<&NormalizedOrderRecord>> = BTreeMap::new();
    for record in records {
        partitions
            .entry(PartitionKey::from_order_date(record.order_date.as_deref()))
            .or_default()
            .push(record);
    }
    partitions
}

/// Writes the processed layer as one Parquet file per `order_date`
///
/// Every write replaces the whole layer. Concurrent writers targeting the
/// same root are not supported.
#[derive(Debug, Clone)]
pub struct PartitionedWriter {
    destination: OutputDestination,
    parquet: ParquetWriterConfig,
    write_concurrency: usize,
}

impl PartitionedWriter {
    /// Create a writer for `destination`
    pub fn new(destination: OutputDestination, parquet: ParquetWriterConfig) -> Self {
        Self {
            destination,
            parquet,
            write_concurrency: 4,
        }
    }

    /// Set the maximum number of partition files written at once
    #[must_use]
    pub fn with_write_concurrency(mut self, write_concurrency: usize) -> Self {
        self.write_concurrency = write_concurrency.max(1);
        self
    }

    /// Replace the processed layer with `records`
    ///
    /// Returns the written partitions in key order.
    pub async fn write(&self, records: &[NormalizedOrderRecord]) -> Result<Vec<WrittenPartition>> {
        let partitions = partition_records(records);

        let removed = self.destination.clear().await?;
        if removed > 0 {
            debug!("Cleared {removed} objects from the processed layer");
        }

        let mut written: Vec<WrittenPartition> = stream::iter(partitions)
            .map(|(key, rows)| self.write_partition(key, rows))
            .buffer_unordered(self.write_concurrency)
            .try_collect()
            .await?;
        written.sort_by(|a, b| a.key.cmp(&b.key));

        info!(
            "Wrote {} records across {} partitions",
            records.len(),
            written.len()
        );
        Ok(written)
    }

    async fn write_partition(
        &self,
        key: PartitionKey,
        records: Vec<&NormalizedOrderRecord>,
    ) -> Result<WrittenPartition> {
        let file_path = key.file_path();
        let as_write_error = |e: Error| Error::write(&file_path, e.to_string());

        let batch = processed_batch(&records).map_err(as_write_error)?;
        let data = encode_parquet(&batch, &self.parquet).map_err(as_write_error)?;
        let path = self.destination.write(&file_path, data).await?;

        debug!("Wrote partition {key}: {} rows", records.len());
        Ok(WrittenPartition {
            key,
            rows: records.len(),
            path,
        })
    }
}
