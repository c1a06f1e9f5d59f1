//! Object store capability trait

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;

/// Minimal object store capability the raw ingestor depends on
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// List every key under `prefix` in `bucket`
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Fetch the full contents of one object
    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes>;
}

#[async_trait]
impl<T: ObjectStoreClient + ?Sized> ObjectStoreClient for std::sync::Arc<T> {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        (**self).list(bucket, prefix).await
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes> {
        (**self).get(bucket, key).await
    }
}
