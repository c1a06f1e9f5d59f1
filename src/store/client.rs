//! Object store client backed by the `object_store` crate
//!
//! Supports S3 (and S3-compatible servers) and local directories.

use super::types::ObjectStoreClient;
use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Object store client
///
/// A bucket connection is opened for every call and dropped when the call
/// returns, on success and on error alike.
#[derive(Debug, Clone)]
pub struct StoreClient {
    config: StoreConfig,
}

impl StoreClient {
    /// Create a client for the given backend
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Create a client over a local directory tree
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::new(StoreConfig::Local { root: root.into() })
    }

    /// Open a connection scoped to one bucket
    fn connect(&self, bucket: &str) -> Result<Arc<dyn ObjectStore>> {
        match &self.config {
            StoreConfig::S3 {
                endpoint,
                region,
                allow_http,
                access_key_id,
                secret_access_key,
            } => {
                let mut builder = AmazonS3Builder::from_env()
                    .with_bucket_name(bucket)
                    .with_region(region)
                    .with_allow_http(*allow_http);

                if let Some(endpoint) = endpoint.clone().none_if_empty() {
                    builder = builder.with_endpoint(endpoint);
                }
                if let Some(key) = access_key_id.clone().none_if_empty() {
                    builder = builder.with_access_key_id(key);
                }
                if let Some(secret) = secret_access_key.clone().none_if_empty() {
                    builder = builder.with_secret_access_key(secret);
                }

                let store = builder.build().map_err(|e| {
                    Error::unreachable("connect", format!("Failed to create S3 client: {e}"))
                })?;
                Ok(Arc::new(store))
            }
            StoreConfig::Local { root } => {
                let dir = root.join(bucket);
                if !dir.is_dir() {
                    return Err(Error::unreachable(
                        "connect",
                        format!("bucket directory {} does not exist", dir.display()),
                    ));
                }
                let store = LocalFileSystem::new_with_prefix(&dir).map_err(|e| {
                    Error::unreachable("connect", format!("Failed to create local store: {e}"))
                })?;
                Ok(Arc::new(store))
            }
        }
    }
}

#[async_trait]
impl ObjectStoreClient for StoreClient {
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        let store = self.connect(bucket)?;

        // `ObjectStore::list` matches whole path segments, so list from the
        // enclosing directory and filter on the raw string prefix
        let prefix = prefix.trim_start_matches('/');
        let dir = prefix.rfind('/').map_or("", |idx| &prefix[..idx]);
        let dir = (!dir.is_empty()).then(|| ObjectPath::from(dir));

        let objects: Vec<ObjectMeta> = store
            .list(dir.as_ref())
            .try_collect()
            .await
            .map_err(|e| classify("list", e))?;

        let keys: Vec<String> = objects
            .into_iter()
            .map(|meta| meta.location.to_string())
            .filter(|key| key.starts_with(prefix))
            .collect();

        debug!("Listed {} objects under {bucket}/{prefix}", keys.len());
        Ok(keys)
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let store = self.connect(bucket)?;
        let location = ObjectPath::from(key);

        let result = store
            .get(&location)
            .await
            .map_err(|e| classify("get", e))?;
        let bytes = result.bytes().await.map_err(|e| classify("get", e))?;

        debug!("Fetched {bucket}/{key} ({} bytes)", bytes.len());
        Ok(bytes)
    }
}

/// Map an object store failure onto the connectivity error, marking
/// failures that cannot succeed on retry
pub(crate) fn classify(operation: &str, err: object_store::Error) -> Error {
    match err {
        object_store::Error::NotFound { path, .. } => {
            Error::unreachable(operation, format!("object not found: {path}"))
        }
        object_store::Error::InvalidPath { source } => {
            Error::unreachable(operation, format!("invalid path: {source}"))
        }
        object_store::Error::NotSupported { source } => {
            Error::unreachable(operation, format!("not supported: {source}"))
        }
        other => Error::connectivity(operation, other.to_string()),
    }
}
