//! Raw ingestion module
//!
//! Lists raw extract snapshots, fetches them and parses their `data` arrays
//! into one ordered stream of [`OrderRecord`]s.
//!
//! # Overview
//!
//! - Keys are sorted before fetching, so the record stream order depends only
//!   on the set of raw objects.
//! - Fetches run concurrently but are consumed in key order.
//! - Any object that is not a JSON envelope with a `data` array aborts the
//!   whole run.

mod decoder;
mod ingestor;
mod types;

pub use decoder::ExtractDecoder;
pub use ingestor::RawIngestor;
pub use types::{ExtractEnvelope, OrderRecord, RawExtractObject};
