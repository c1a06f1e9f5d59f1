//! Parquet encoding
//!
//! Batches are encoded in memory and handed to an [`OutputDestination`] as
//! a single object, so every table or partition is exactly one file.
//!
//! [`OutputDestination`]: super::OutputDestination

use crate::config::OutputConfig;
use crate::error::Result;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

/// Configuration for Parquet encoding
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
        }
    }
}

impl ParquetWriterConfig {
    /// Derive encoding settings from the output section
    #[must_use]
    pub fn from_output(config: &OutputConfig) -> Self {
        Self::default().with_compression(config.compression.into())
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .set_created_by(format!("{} {}", crate::NAME, crate::VERSION))
            .build()
    }
}

/// Encode a batch as a complete Parquet file
///
/// The output depends only on the batch contents and the config, so
/// identical input encodes to identical bytes.
pub fn encode_parquet(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), Some(config.build_properties()))?;
    writer.write(batch)?;
    writer.close()?;
    Ok(Bytes::from(buf))
}
