//! Output module
//!
//! Handles Arrow RecordBatch creation and Parquet file writing.
//!
//! # Overview
//!
//! This module provides:
//! - Fixed Arrow schemas for the processed and golden tables
//! - In-memory Parquet encoding, one file per table or partition
//! - Output destinations (local filesystem, S3, R2, GCS, Azure)
//! - The golden layer writer

mod destination;
mod golden;
mod schema;
mod writer;

pub use destination::{root_segments, roots_overlap, OutputDestination};
pub use golden::{GoldenWriter, DIM_CUSTOMERS, DIM_PRODUCTS, FACT_ORDERS};
pub use schema::{
    dim_customers_batch, dim_customers_schema, dim_products_batch, dim_products_schema,
    fact_orders_batch, fact_orders_schema, processed_batch, processed_schema,
};
pub use writer::{encode_parquet, ParquetWriterConfig};
