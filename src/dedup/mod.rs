//! Deduplication module
//!
//! Builds the golden tables from normalized records:
//! - `fact_orders`: one row per `order_id`
//! - `dim_customers`: one row per `customer_id`
//! - `dim_products`: one row per `product_id`
//!
//! # Tie-break
//!
//! Among records sharing an `order_id` the one with the latest `updated_at`
//! wins; on equal (or equally unparsable) `updated_at` the record seen first
//! in the ingestion stream wins. A parsable `updated_at` always beats an
//! unparsable one. Dimension rows keep first-encounter order.

mod tables;
mod types;

pub use tables::{dim_customers, dim_products, Deduplicator};
pub use types::{DimCustomer, DimProduct, FactOrderRecord, GoldenTables};
