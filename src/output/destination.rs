//! Output destinations (local, S3, R2, GCS, Azure)

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::path::Path as ObjectPath;
use object_store::{ObjectMeta, ObjectStore};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Root location an output layer is written under
#[derive(Debug, Clone)]
pub struct OutputDestination {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Base path prefix within the bucket/container
    prefix: String,
    /// Original URL scheme for logging
    scheme: String,
    /// Directory backing a local destination
    local_root: Option<PathBuf>,
}

impl OutputDestination {
    /// Parse a destination URL and create the matching object store
    ///
    /// Supported formats:
    /// - `s3://bucket/path/` - AWS S3 (or S3-compatible via `AWS_ENDPOINT`)
    /// - `r2://bucket/path/` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket/path/` - Google Cloud Storage
    /// - `az://container/path/` - Azure Blob Storage
    /// - `/local/path/` or `./path/` - Local filesystem
    ///
    /// A local destination directory is created if missing.
    pub fn parse(url: &str) -> Result<Self> {
        if url.starts_with("s3://") {
            Self::parse_s3(url, false)
        } else if url.starts_with("r2://") {
            Self::parse_s3(url, true)
        } else if url.starts_with("gs://") {
            Self::parse_gcs(url)
        } else if url.starts_with("az://") {
            Self::parse_azure(url)
        } else {
            Self::parse_local(url)
        }
    }

    /// Parse S3 or R2 URL
    fn parse_s3(url: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let (bucket, prefix) = split_url(url, scheme)?;

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self::remote(Arc::new(store), prefix, scheme))
    }

    /// Parse GCS URL
    fn parse_gcs(url: &str) -> Result<Self> {
        let (bucket, prefix) = split_url(url, "gs")?;

        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self::remote(Arc::new(store), prefix, "gs"))
    }

    /// Parse Azure Blob URL
    fn parse_azure(url: &str) -> Result<Self> {
        let (container, prefix) = split_url(url, "az")?;

        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self::remote(Arc::new(store), prefix, "az"))
    }

    /// Parse local filesystem path
    fn parse_local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        std::fs::create_dir_all(path)
            .map_err(|e| Error::write(path, format!("Failed to create directory: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::write(path, format!("Failed to open local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            prefix: String::new(),
            scheme: "file".to_string(),
            local_root: Some(PathBuf::from(path)),
        })
    }

    fn remote(store: Arc<dyn ObjectStore>, prefix: String, scheme: &str) -> Self {
        Self {
            store,
            prefix: prefix.trim_matches('/').to_string(),
            scheme: scheme.to_string(),
            local_root: None,
        }
    }

    fn location(&self, relative: &str) -> ObjectPath {
        if self.prefix.is_empty() {
            ObjectPath::from(relative)
        } else {
            ObjectPath::from(format!("{}/{relative}", self.prefix))
        }
    }

    /// Remove everything under this destination
    ///
    /// Returns the number of objects removed from a cloud destination; a
    /// local destination directory is removed and recreated wholesale.
    pub async fn clear(&self) -> Result<usize> {
        if let Some(root) = &self.local_root {
            match tokio::fs::remove_dir_all(root).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(Error::write(
                        root.display().to_string(),
                        format!("Failed to clear directory: {e}"),
                    ))
                }
            }
            tokio::fs::create_dir_all(root).await.map_err(|e| {
                Error::write(
                    root.display().to_string(),
                    format!("Failed to recreate directory: {e}"),
                )
            })?;
            return Ok(0);
        }

        let prefix = (!self.prefix.is_empty()).then(|| ObjectPath::from(self.prefix.as_str()));
        let existing: Vec<ObjectMeta> = self
            .store
            .list(prefix.as_ref())
            .try_collect()
            .await
            .map_err(|e| Error::write(&self.prefix, format!("Failed to list old output: {e}")))?;

        for meta in &existing {
            self.store.delete(&meta.location).await.map_err(|e| {
                Error::write(meta.location.to_string(), format!("Failed to delete: {e}"))
            })?;
        }

        debug!("Removed {} old objects under {}", existing.len(), self.prefix);
        Ok(existing.len())
    }

    /// Write bytes to a file in the destination, replacing any previous file
    pub async fn write(&self, relative: &str, data: Bytes) -> Result<String> {
        let path = self.location(relative);

        self.store
            .put(&path, data.into())
            .await
            .map_err(|e| Error::write(path.to_string(), e.to_string()))?;

        // Return full path for logging
        let full_path = format!("{}://{path}", self.scheme);
        Ok(full_path)
    }
}

/// Location of an output root as comparable segments
///
/// The first segment names the backend and bucket (`s3://lake`) or `file`
/// for local paths; the rest are the path segments below it, with empty and
/// `.` segments dropped and `..` resolved. Relative local paths are resolved
/// against the current directory.
pub fn root_segments(url: &str) -> Result<Vec<String>> {
    for scheme in ["s3", "r2", "gs", "az"] {
        if url.starts_with(&format!("{scheme}://")) {
            let (bucket, prefix) = split_url(url, scheme)?;
            let mut segments = vec![format!("{scheme}://{bucket}")];
            segments.extend(normalize_segments(prefix.split('/')));
            return Ok(segments);
        }
    }

    let path = Path::new(url.strip_prefix("file://").unwrap_or(url));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::config(format!("Cannot resolve {url}: {e}")))?
            .join(path)
    };

    let mut segments = vec!["file".to_string()];
    let parts = absolute.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
        Component::ParentDir => Some("..".to_string()),
        Component::RootDir | Component::Prefix(_) | Component::CurDir => None,
    });
    segments.extend(normalize_segments(parts));
    Ok(segments)
}

/// True when two output roots are the same location or one lies inside the
/// other
pub fn roots_overlap(a: &str, b: &str) -> Result<bool> {
    let a = root_segments(a)?;
    let b = root_segments(b)?;
    Ok(a.starts_with(&b) || b.starts_with(&a))
}

fn normalize_segments<S: AsRef<str>>(parts: impl IntoIterator<Item = S>) -> Vec<String> {
    let mut segments: Vec<String> = Vec::new();
    for part in parts {
        match part.as_ref() {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other.to_string()),
        }
    }
    segments
}

/// Split `scheme://bucket/prefix` into bucket and prefix
fn split_url<'a>(url: &'a str, scheme: &str) -> Result<(&'a str, String)> {
    let without_scheme = url
        .strip_prefix(&format!("{scheme}://"))
        .ok_or_else(|| Error::config(format!("Invalid {scheme} URL: {url}")))?;

    let (bucket, prefix) = match without_scheme.find('/') {
        Some(idx) => (
            &without_scheme[..idx],
            without_scheme[idx + 1..].to_string(),
        ),
        None => (without_scheme, String::new()),
    };

    if bucket.is_empty() {
        return Err(Error::config(format!("Missing bucket in URL: {url}")));
    }
    Ok((bucket, prefix))
}
