//! Pipeline configuration
//!
//! All settings have defaults matching a local development setup (an
//! S3-compatible server on `localhost:9000` holding a `raw` bucket, outputs
//! under `storage/`). A YAML file can override any subset of them, and the
//! CLI overrides the file.

use crate::error::{Error, Result};
use crate::output::roots_overlap;
use crate::types::{BackoffType, CompressionCodec};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Where raw extract snapshots are read from
    pub source: SourceConfig,

    /// Where processed and golden tables are written
    pub output: OutputConfig,

    /// Record normalization settings
    pub normalize: NormalizeConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Render the configuration as YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check values that serde cannot reject on its own
    pub fn validate(&self) -> Result<()> {
        if self.source.bucket.is_empty() {
            return Err(Error::config("source.bucket must not be empty"));
        }
        if self.source.fetch_concurrency == 0 {
            return Err(Error::config("source.fetch_concurrency must be at least 1"));
        }
        if self.output.write_concurrency == 0 {
            return Err(Error::config("output.write_concurrency must be at least 1"));
        }
        if self.output.processed_path.is_empty() || self.output.golden_path.is_empty() {
            return Err(Error::config("output paths must not be empty"));
        }
        if roots_overlap(&self.output.processed_path, &self.output.golden_path)? {
            return Err(Error::config(format!(
                "output.processed_path ({}) and output.golden_path ({}) must not be the same \
                 location or nested inside each other",
                self.output.processed_path, self.output.golden_path
            )));
        }
        if self.normalize.timestamp_format.is_empty() {
            return Err(Error::config("normalize.timestamp_format must not be empty"));
        }
        Ok(())
    }
}

// ============================================================================
// Source
// ============================================================================

/// Raw layer location and fetch behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Object store backend
    pub store: StoreConfig,

    /// Bucket holding raw snapshots
    pub bucket: String,

    /// Key prefix of the snapshots to ingest
    pub prefix: String,

    /// Maximum number of objects fetched at once
    pub fetch_concurrency: usize,

    /// Retry policy for list/get calls
    pub retry: RetryConfig,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            bucket: "raw".to_string(),
            prefix: "full/".to_string(),
            fetch_concurrency: 8,
            retry: RetryConfig::default(),
        }
    }
}

/// Object store backend selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// S3 or any S3-compatible server
    S3 {
        /// Custom endpoint (e.g. a local S3-compatible server)
        #[serde(default)]
        endpoint: Option<String>,
        /// Region name
        #[serde(default = "default_region")]
        region: String,
        /// Allow plain HTTP endpoints
        #[serde(default = "default_true")]
        allow_http: bool,
        /// Access key id (falls back to `AWS_ACCESS_KEY_ID`)
        #[serde(default)]
        access_key_id: Option<String>,
        /// Secret access key (falls back to `AWS_SECRET_ACCESS_KEY`)
        #[serde(default)]
        secret_access_key: Option<String>,
    },

    /// Local directory; each bucket is a sub-directory of `root`
    Local {
        /// Root directory
        root: PathBuf,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::S3 {
            endpoint: Some("http://localhost:9000".to_string()),
            region: default_region(),
            allow_http: true,
            access_key_id: None,
            secret_access_key: None,
        }
    }
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_true() -> bool {
    true
}

/// Retry-with-backoff policy for transient object store failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds
    pub initial_backoff_ms: u64,
    /// Upper bound on any single delay, in milliseconds
    pub max_backoff_ms: u64,
    /// How the delay grows between attempts
    pub backoff_type: BackoffType,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 100,
            max_backoff_ms: 10_000,
            backoff_type: BackoffType::Exponential,
        }
    }
}

impl RetryConfig {
    /// No retries at all
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Delay before retry number `attempt` (0-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let initial = Duration::from_millis(self.initial_backoff_ms);
        let delay = match self.backoff_type {
            BackoffType::Constant => initial,
            BackoffType::Linear => initial.saturating_mul(attempt + 1),
            BackoffType::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };

        std::cmp::min(delay, Duration::from_millis(self.max_backoff_ms))
    }
}

// ============================================================================
// Output
// ============================================================================

/// Output locations and Parquet settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root of the processed (silver) layer; local path or cloud URL
    pub processed_path: String,

    /// Root of the golden layer; local path or cloud URL
    pub golden_path: String,

    /// Parquet compression codec
    pub compression: CompressionCodec,

    /// Maximum number of partition files written at once
    pub write_concurrency: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            processed_path: "storage/processed".to_string(),
            golden_path: "storage/golden".to_string(),
            compression: CompressionCodec::Snappy,
            write_concurrency: 4,
        }
    }
}

// ============================================================================
// Normalize
// ============================================================================

/// Record normalization settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// `chrono` format used to parse `created_at` and `updated_at` (UTC)
    pub timestamp_format: String,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            timestamp_format: "%Y-%m-%dT%H:%M:%S%.f".to_string(),
        }
    }
}
