//! Fixed Arrow schemas for the processed and golden tables
//!
//! Every table has a declared schema rather than one inferred from the data,
//! so an empty or all-null column still lands with the same type each run.

use crate::dedup::{DimCustomer, DimProduct, FactOrderRecord};
use crate::error::Result;
use crate::normalize::NormalizedOrderRecord;
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDateTime;
use std::sync::Arc;

/// Timezone attached to `order_ts`
const UTC: &str = "UTC";

fn timestamp_type() -> DataType {
    DataType::Timestamp(TimeUnit::Microsecond, Some(UTC.into()))
}

fn timestamps<'a>(values: impl Iterator<Item = Option<&'a NaiveDateTime>>) -> ArrayRef {
    let micros: Vec<Option<i64>> = values
        .map(|ts| ts.map(|ts| ts.and_utc().timestamp_micros()))
        .collect();
    Arc::new(TimestampMicrosecondArray::from(micros).with_timezone(UTC))
}

fn strings<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ArrayRef {
    Arc::new(values.collect::<StringArray>())
}

// ============================================================================
// Processed Layer
// ============================================================================

/// Schema of a processed partition file
pub fn processed_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("order_id", DataType::Utf8, false),
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("product_id", DataType::Utf8, false),
        Field::new("product_name", DataType::Utf8, true),
        Field::new("category", DataType::Utf8, true),
        Field::new("qty", DataType::Int64, false),
        Field::new("price", DataType::Float64, false),
        Field::new("status", DataType::Utf8, true),
        Field::new("created_at", DataType::Utf8, true),
        Field::new("updated_at", DataType::Utf8, true),
        Field::new("total_price", DataType::Float64, false),
        Field::new("order_ts", timestamp_type(), true),
        Field::new("order_date", DataType::Utf8, true),
    ]))
}

/// Build a processed batch from normalized records
pub fn processed_batch(records: &[&NormalizedOrderRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        strings(records.iter().map(|r| Some(r.order_id.as_str()))),
        strings(records.iter().map(|r| Some(r.customer_id.as_str()))),
        strings(records.iter().map(|r| Some(r.product_id.as_str()))),
        strings(records.iter().map(|r| r.product_name.as_deref())),
        strings(records.iter().map(|r| r.category.as_deref())),
        Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.qty))),
        Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.price))),
        strings(records.iter().map(|r| r.status.as_deref())),
        strings(records.iter().map(|r| r.created_at.as_deref())),
        strings(records.iter().map(|r| r.updated_at.as_deref())),
        Arc::new(Float64Array::from_iter_values(
            records.iter().map(|r| r.total_price),
        )),
        timestamps(records.iter().map(|r| r.order_ts.as_ref())),
        strings(records.iter().map(|r| r.order_date.as_deref())),
    ];

    Ok(RecordBatch::try_new(processed_schema(), columns)?)
}

// ============================================================================
// Golden Layer
// ============================================================================

/// Schema of `fact_orders`
pub fn fact_orders_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![
        Field::new("order_id", DataType::Utf8, false),
        Field::new("customer_id", DataType::Utf8, false),
        Field::new("product_id", DataType::Utf8, false),
        Field::new("qty", DataType::Int64, false),
        Field::new("total_price", DataType::Float64, false),
        Field::new("status", DataType::Utf8, true),
        Field::new("created_at", DataType::Utf8, true),
        Field::new("order_ts", timestamp_type(), true),
    ]))
}

/// Build the `fact_orders` batch
pub fn fact_orders_batch(facts: &[FactOrderRecord]) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = vec![
        strings(facts.iter().map(|f| Some(f.order_id.as_str()))),
        strings(facts.iter().map(|f| Some(f.customer_id.as_str()))),
        strings(facts.iter().map(|f| Some(f.product_id.as_str()))),
        Arc::new(Int64Array::from_iter_values(facts.iter().map(|f| f.qty))),
        Arc::new(Float64Array::from_iter_values(
            facts.iter().map(|f| f.total_price),
        )),
        strings(facts.iter().map(|f| f.status.as_deref())),
        strings(facts.iter().map(|f| f.created_at.as_deref())),
        timestamps(facts.iter().map(|f| f.order_ts.as_ref())),
    ];

    Ok(RecordBatch::try_new(fact_orders_schema(), columns)?)
}

/// Schema of `dim_customers`
pub fn dim_customers_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![Field::new(
        "customer_id",
        DataType::Utf8,
        false,
    )]))
}

/// Build the `dim_customers` batch
pub fn dim_customers_batch(customers: &[DimCustomer]) -> Result<RecordBatch> {
    let ids = strings(customers.iter().map(|c| Some(c.customer_id.as_str())));
    Ok(RecordBatch::try_new(dim_customers_schema(), vec![ids])?)
}

/// Schema of `dim_products`
pub fn dim_products_schema() -> SchemaRef {
    Arc::new(Schema::new(vec![Field::new(
        "product_id",
        DataType::Utf8,
        false,
    )]))
}

/// Build the `dim_products` batch
pub fn dim_products_batch(products: &[DimProduct]) -> Result<RecordBatch> {
    let ids = strings(products.iter().map(|p| Some(p.product_id.as_str())));
    Ok(RecordBatch::try_new(dim_products_schema(), vec![ids])?)
}
