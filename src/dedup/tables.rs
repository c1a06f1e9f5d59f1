//! Fact and dimension builders

use super::types::{DimCustomer, DimProduct, FactOrderRecord, GoldenTables};
use crate::normalize::{NormalizedOrderRecord, TimestampParser};
use chrono::NaiveDateTime;
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Projects and deduplicates normalized records into golden tables
#[derive(Debug, Clone, Default)]
pub struct Deduplicator {
    /// Parses `updated_at` for the tie-break, in the same format as `created_at`
    timestamps: TimestampParser,
}

impl Deduplicator {
    /// Create a deduplicator that reads `updated_at` with `timestamps`
    pub fn new(timestamps: TimestampParser) -> Self {
        Self { timestamps }
    }

    /// Build all three tables
    pub fn build(&self, records: &[NormalizedOrderRecord]) -> GoldenTables {
        GoldenTables {
            fact_orders: self.fact_orders(records),
            dim_customers: dim_customers(records),
            dim_products: dim_products(records),
        }
    }

    /// One row per `order_id`, latest `updated_at` first, then first seen
    pub fn fact_orders(&self, records: &[NormalizedOrderRecord]) -> Vec<FactOrderRecord> {
        let mut slots: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        let mut winners: Vec<(&NormalizedOrderRecord, Option<NaiveDateTime>)> = Vec::new();

        for record in records {
            let updated = self.timestamps.parse(record.updated_at.as_deref());

            match slots.entry(record.order_id.as_str()) {
                Entry::Occupied(slot) => {
                    let current = &mut winners[*slot.get()];
                    if updated > current.1 {
                        debug!(
                            "Order {} superseded: updated_at {:?} over {:?}",
                            record.order_id, record.updated_at, current.0.updated_at
                        );
                        *current = (record, updated);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(winners.len());
                    winners.push((record, updated));
                }
            }
        }

        winners
            .into_iter()
            .map(|(record, _)| FactOrderRecord::from(record))
            .collect()
    }
}

/// One row per `customer_id`, first-encounter order
pub fn dim_customers(records: &[NormalizedOrderRecord]) -> Vec<DimCustomer> {
    distinct(records.iter().map(|r| r.customer_id.as_str()))
        .into_iter()
        .map(|customer_id| DimCustomer { customer_id })
        .collect()
}

/// One row per `product_id`, first-encounter order
pub fn dim_products(records: &[NormalizedOrderRecord]) -> Vec<DimProduct> {
    distinct(records.iter().map(|r| r.product_id.as_str()))
        .into_iter()
        .map(|product_id| DimProduct { product_id })
        .collect()
}

fn distinct<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.filter(|key| seen.insert(*key))
        .map(String::from)
        .collect()
}
