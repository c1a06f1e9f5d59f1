//! Raw layer data types

use crate::types::JsonValue;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One fetched raw object, alive only until it has been parsed
#[derive(Debug, Clone)]
pub struct RawExtractObject {
    /// Object key within the source bucket
    pub key: String,
    /// Undecoded object body
    pub payload: Bytes,
}

impl RawExtractObject {
    /// Create a raw object
    pub fn new(key: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            payload: payload.into(),
        }
    }
}

/// Envelope emitted by the upstream extract service
///
/// Only `data` is required; the metadata fields are present on full
/// (`status`, `mode`, `count`) and incremental (`since`) extracts.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub since: Option<String>,
    pub data: Vec<JsonValue>,
}

/// A raw order record as found in the extract
///
/// `qty` and `price` keep whatever JSON scalar the extract carried; the
/// normalizer is responsible for casting them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub customer_id: String,
    pub product_id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub qty: JsonValue,
    #[serde(default)]
    pub price: JsonValue,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}
