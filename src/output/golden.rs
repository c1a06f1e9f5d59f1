//! Golden layer writer

use super::destination::OutputDestination;
use super::schema::{dim_customers_batch, dim_products_batch, fact_orders_batch};
use super::writer::{encode_parquet, ParquetWriterConfig};
use crate::dedup::GoldenTables;
use crate::error::{Error, Result};
use arrow::record_batch::RecordBatch;
use tracing::{error, info};

/// Name of the fact table artifact
pub const FACT_ORDERS: &str = "fact_orders";
/// Name of the customer dimension artifact
pub const DIM_CUSTOMERS: &str = "dim_customers";
/// Name of the product dimension artifact
pub const DIM_PRODUCTS: &str = "dim_products";

/// Writes the three golden tables, one Parquet file each
#[derive(Debug, Clone)]
pub struct GoldenWriter {
    destination: OutputDestination,
    parquet: ParquetWriterConfig,
}

impl GoldenWriter {
    /// Create a writer for `destination`
    pub fn new(destination: OutputDestination, parquet: ParquetWriterConfig) -> Self {
        Self {
            destination,
            parquet,
        }
    }

    /// File name of a table's artifact
    pub fn file_name(table: &str) -> String {
        format!("{table}.parquet")
    }

    /// Write all tables, replacing the previous run's files
    ///
    /// The three writes run concurrently and are all awaited. If any of them
    /// fails the first failure is returned, even though the others may have
    /// landed.
    pub async fn write(&self, tables: &GoldenTables) -> Result<Vec<String>> {
        let (fact, customers, products) = futures::join!(
            self.write_table(FACT_ORDERS, fact_orders_batch(&tables.fact_orders)),
            self.write_table(DIM_CUSTOMERS, dim_customers_batch(&tables.dim_customers)),
            self.write_table(DIM_PRODUCTS, dim_products_batch(&tables.dim_products)),
        );

        let mut written = Vec::with_capacity(3);
        let mut first_error = None;
        for result in [fact, customers, products] {
            match result {
                Ok(path) => written.push(path),
                Err(e) => {
                    error!("{e}");
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(written),
        }
    }

    async fn write_table(&self, table: &str, batch: Result<RecordBatch>) -> Result<String> {
        let as_write_error = |e: Error| Error::write(table, e.to_string());

        let batch = batch.map_err(as_write_error)?;
        let rows = batch.num_rows();
        let data = encode_parquet(&batch, &self.parquet).map_err(as_write_error)?;
        let path = self
            .destination
            .write(&Self::file_name(table), data)
            .await
            .map_err(as_write_error)?;

        info!("Wrote {table}: {rows} rows to {path}");
        Ok(path)
    }
}
