//! Record normalization module
//!
//! Casts `qty`/`price`, derives `total_price`, and parses `created_at` into
//! `order_ts`/`order_date`.
//!
//! Cast failures abort the run. Timestamp failures do not: the record keeps
//! flowing with empty `order_ts`/`order_date`.

mod normalizer;
mod types;

pub use normalizer::{cast_price, cast_qty, RecordNormalizer, TimestampParser};
pub use types::{NormalizedBatch, NormalizedOrderRecord};
