//! Record normalizer

use super::types::{NormalizedBatch, NormalizedOrderRecord};
use crate::config::NormalizeConfig;
use crate::error::{Error, Result};
use crate::ingest::OrderRecord;
use crate::types::JsonValue;
use chrono::NaiveDateTime;
use tracing::{debug, warn};

/// Format of the derived `order_date`
const ORDER_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses order timestamps in one configured `chrono` format (UTC)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParser {
    format: String,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self::from_config(&NormalizeConfig::default())
    }
}

impl TimestampParser {
    /// Create a parser for `format`
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
        }
    }

    /// Create a parser from configuration
    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self::new(config.timestamp_format.clone())
    }

    /// The accepted format
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Parse a timestamp, `None` when absent or in any other shape
    pub fn parse(&self, text: Option<&str>) -> Option<NaiveDateTime> {
        let text = text?.trim();
        NaiveDateTime::parse_from_str(text, &self.format).ok()
    }
}

/// Casts and enriches raw order records
#[derive(Debug, Clone, Default)]
pub struct RecordNormalizer {
    timestamps: TimestampParser,
}

impl RecordNormalizer {
    /// Create a normalizer accepting timestamps in `timestamp_format`
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamps: TimestampParser::new(timestamp_format),
        }
    }

    /// Create a normalizer from configuration
    pub fn from_config(config: &NormalizeConfig) -> Self {
        Self {
            timestamps: TimestampParser::from_config(config),
        }
    }

    /// Parser used for `created_at`
    pub fn timestamps(&self) -> &TimestampParser {
        &self.timestamps
    }

    /// Normalize a single record
    pub fn normalize(&self, record: OrderRecord) -> Result<NormalizedOrderRecord> {
        let qty = cast_qty(&record.qty)
            .ok_or_else(|| Error::cast(&record.order_id, "qty", record.qty.to_string()))?;
        let price = cast_price(&record.price)
            .ok_or_else(|| Error::cast(&record.order_id, "price", record.price.to_string()))?;

        let order_ts = self.timestamps.parse(record.created_at.as_deref());
        let order_date = order_ts.map(|ts| ts.format(ORDER_DATE_FORMAT).to_string());

        Ok(NormalizedOrderRecord {
            order_id: record.order_id,
            customer_id: record.customer_id,
            product_id: record.product_id,
            product_name: record.product_name,
            category: record.category,
            qty,
            price,
            status: record.status,
            created_at: record.created_at,
            updated_at: record.updated_at,
            total_price: qty as f64 * price,
            order_ts,
            order_date,
        })
    }

    /// Normalize every record of a run, stopping at the first cast failure
    pub fn normalize_all(&self, records: Vec<OrderRecord>) -> Result<NormalizedBatch> {
        let mut normalized = Vec::with_capacity(records.len());
        let mut unparsed_timestamps = 0;

        for record in records {
            let record = self.normalize(record)?;
            if record.order_ts.is_none() {
                debug!(
                    "Order {} has unparsable created_at {:?}",
                    record.order_id, record.created_at
                );
                unparsed_timestamps += 1;
            }
            normalized.push(record);
        }

        if unparsed_timestamps > 0 {
            warn!(
                "{unparsed_timestamps} records have no parsable created_at (expected format {})",
                self.timestamps.format()
            );
        }

        Ok(NormalizedBatch {
            records: normalized,
            unparsed_timestamps,
        })
    }
}

/// Cast a raw `qty` to an integer
///
/// Accepts integers, floats without a fractional part, and strings holding
/// either. Everything else, including null, is rejected.
pub fn cast_qty(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

/// Cast a raw `price` to a finite float
pub fn cast_price(value: &JsonValue) -> Option<f64> {
    let price = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    price.is_finite().then_some(price)
}

#[allow(clippy::float_cmp)]
fn integral(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.is_finite() && value.fract() == 0.0 && in_range).then_some(value as i64)
}
