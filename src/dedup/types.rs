//! Golden table row types

use crate::normalize::NormalizedOrderRecord;
use chrono::NaiveDateTime;

/// Row of `fact_orders`
#[derive(Debug, Clone, PartialEq)]
pub struct FactOrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    pub qty: i64,
    pub total_price: f64,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub order_ts: Option<NaiveDateTime>,
}

impl From<&NormalizedOrderRecord> for FactOrderRecord {
    fn from(record: &NormalizedOrderRecord) -> Self {
        Self {
            order_id: record.order_id.clone(),
            customer_id: record.customer_id.clone(),
            product_id: record.product_id.clone(),
            qty: record.qty,
            total_price: record.total_price,
            status: record.status.clone(),
            created_at: record.created_at.clone(),
            order_ts: record.order_ts,
        }
    }
}

/// Row of `dim_customers`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DimCustomer {
    pub customer_id: String,
}

/// Row of `dim_products`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DimProduct {
    pub product_id: String,
}

/// The three golden tables of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoldenTables {
    pub fact_orders: Vec<FactOrderRecord>,
    pub dim_customers: Vec<DimCustomer>,
    pub dim_products: Vec<DimProduct>,
}
