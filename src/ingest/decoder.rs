//! Extract envelope decoder

use super::types::{ExtractEnvelope, OrderRecord, RawExtractObject};
use crate::error::{Error, Result};
use tracing::{debug, warn};

/// Decodes a raw object into order records
///
/// The payload must be a JSON object whose `data` field is an array of
/// order-shaped objects.
#[derive(Debug, Clone, Default)]
pub struct ExtractDecoder;

impl ExtractDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self
    }

    /// Parse the envelope and every entry of its `data` array
    pub fn decode(&self, object: &RawExtractObject) -> Result<Vec<OrderRecord>> {
        let envelope: ExtractEnvelope = serde_json::from_slice(&object.payload)
            .map_err(|e| Error::malformed(&object.key, format!("invalid extract envelope: {e}")))?;

        if let Some(count) = envelope.count {
            if count != envelope.data.len() {
                warn!(
                    "{}: envelope count {count} does not match {} data entries",
                    object.key,
                    envelope.data.len()
                );
            }
        }

        debug!(
            "{}: mode={} status={} since={} entries={}",
            object.key,
            envelope.mode.as_deref().unwrap_or("-"),
            envelope.status.as_deref().unwrap_or("-"),
            envelope.since.as_deref().unwrap_or("-"),
            envelope.data.len()
        );

        envelope
            .data
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value(entry).map_err(|e| {
                    Error::malformed(&object.key, format!("data entry {index}: {e}"))
                })
            })
            .collect()
    }
}
