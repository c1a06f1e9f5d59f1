//! Normalized record types

use chrono::NaiveDateTime;

/// An order record after casting and enrichment
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedOrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub qty: i64,
    pub price: f64,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    /// `qty * price`
    pub total_price: f64,
    /// Parsed `created_at`, UTC
    pub order_ts: Option<NaiveDateTime>,
    /// `YYYY-MM-DD` of `order_ts`
    pub order_date: Option<String>,
}

/// Output of normalizing a whole run
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Records in ingestion order
    pub records: Vec<NormalizedOrderRecord>,
    /// Records whose `created_at` could not be parsed
    pub unparsed_timestamps: usize,
}
