//! Raw ingestor

use super::decoder::ExtractDecoder;
use super::types::{OrderRecord, RawExtractObject};
use crate::error::{Error, Result};
use crate::store::ObjectStoreClient;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

/// Reads every raw object of a run from the object store
#[derive(Debug, Clone)]
pub struct RawIngestor<C> {
    client: C,
    bucket: String,
    prefix: String,
    fetch_concurrency: usize,
    decoder: ExtractDecoder,
}

impl<C: ObjectStoreClient> RawIngestor<C> {
    /// Create an ingestor for `bucket`/`prefix`
    pub fn new(client: C, bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
            fetch_concurrency: 8,
            decoder: ExtractDecoder::new(),
        }
    }

    /// Set the maximum number of concurrent fetches
    #[must_use]
    pub fn with_fetch_concurrency(mut self, concurrency: usize) -> Self {
        self.fetch_concurrency = concurrency.max(1);
        self
    }

    /// List the raw keys of this run in ingestion order
    ///
    /// Fails with `EmptyInput` when nothing matches the prefix.
    pub async fn list_keys(&self) -> Result<Vec<String>> {
        let mut keys = self.client.list(&self.bucket, &self.prefix).await?;
        if keys.is_empty() {
            return Err(Error::empty_input(&self.bucket, &self.prefix));
        }

        keys.sort();
        keys.dedup();
        info!(
            "Found {} raw objects under {}/{}",
            keys.len(),
            self.bucket,
            self.prefix
        );
        Ok(keys)
    }

    /// Fetch the given keys, returning objects in the same order
    pub async fn fetch_all(&self, keys: Vec<String>) -> Result<Vec<RawExtractObject>> {
        stream::iter(keys)
            .map(|key| async move {
                let payload = self.client.get(&self.bucket, &key).await?;
                Ok::<_, Error>(RawExtractObject::new(key, payload))
            })
            .buffered(self.fetch_concurrency)
            .try_collect()
            .await
    }

    /// Parse fetched objects into one record stream
    pub fn parse_all(&self, objects: Vec<RawExtractObject>) -> Result<Vec<OrderRecord>> {
        let mut records = Vec::new();
        for object in objects {
            let parsed = self.decoder.decode(&object)?;
            debug!("Parsed {} records from {}", parsed.len(), object.key);
            records.extend(parsed);
        }
        Ok(records)
    }
}
