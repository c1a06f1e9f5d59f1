//! Retry-with-backoff wrapper for object store clients

use super::types::ObjectStoreClient;
use crate::config::RetryConfig;
use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use std::future::Future;
use tracing::warn;

/// Wraps a client and retries transient connectivity failures
#[derive(Debug, Clone)]
pub struct RetryingClient<C> {
    inner: C,
    policy: RetryConfig,
}

impl<C: ObjectStoreClient> RetryingClient<C> {
    /// Wrap `inner` with the given retry policy
    pub fn new(inner: C, policy: RetryConfig) -> Self {
        Self { inner, policy }
    }

    /// Get the wrapped client
    pub fn inner(&self) -> &C {
        &self.inner
    }

    async fn with_retry<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T>> + Send,
        T: Send,
    {
        let max_retries = self.policy.max_retries;
        let mut attempt = 0;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    let delay = self.policy.backoff(attempt);
                    warn!(
                        "{operation} failed ({e}), attempt {}/{}, retrying in {:?}",
                        attempt + 1,
                        max_retries + 1,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<C: ObjectStoreClient> ObjectStoreClient for RetryingClient<C> {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        self.with_retry("list", || self.inner.list(bucket, prefix))
            .await
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes> {
        self.with_retry("get", || self.inner.get(bucket, key)).await
    }
}
