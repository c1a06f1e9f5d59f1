//! Error types for the order lakehouse pipeline
//!
//! This module defines the error hierarchy for the whole batch job.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Every fatal condition of a run surfaces as exactly one of these variants,
//! and [`Error::kind`] reports which part of the taxonomy it belongs to.

use thiserror::Error;

/// The main error type for the pipeline
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Object Store Errors
    // ============================================================================
    #[error("Object store unreachable during {operation}: {message}")]
    Connectivity {
        operation: String,
        message: String,
        transient: bool,
    },

    // ============================================================================
    // Input Errors
    // ============================================================================
    #[error("No raw objects found under {bucket}/{prefix}")]
    EmptyInput { bucket: String, prefix: String },

    #[error("Malformed raw object '{key}': {message}")]
    MalformedInput { key: String, message: String },

    #[error("Cannot cast field '{field}' of order '{order_id}' from {value}")]
    Cast {
        order_id: String,
        field: String,
        value: String,
    },

    // ============================================================================
    // Output Errors
    // ============================================================================
    #[error("Failed to write {artifact}: {message}")]
    Write { artifact: String, message: String },

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connectivity,
    EmptyInput,
    MalformedInput,
    Cast,
    Write,
    Config,
    Io,
}

impl Error {
    /// Create a connectivity error that is worth retrying
    pub fn connectivity(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connectivity {
            operation: operation.into(),
            message: message.into(),
            transient: true,
        }
    }

    /// Create a connectivity error that will not go away on retry
    pub fn unreachable(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connectivity {
            operation: operation.into(),
            message: message.into(),
            transient: false,
        }
    }

    /// Create an empty input error
    pub fn empty_input(bucket: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::EmptyInput {
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Create a malformed input error
    pub fn malformed(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a cast error
    pub fn cast(
        order_id: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Cast {
            order_id: order_id.into(),
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a write error
    pub fn write(artifact: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Write {
            artifact: artifact.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The taxonomy kind this error originates from
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connectivity { .. } => ErrorKind::Connectivity,
            Error::EmptyInput { .. } => ErrorKind::EmptyInput,
            Error::MalformedInput { .. } | Error::JsonParse(_) => ErrorKind::MalformedInput,
            Error::Cast { .. } => ErrorKind::Cast,
            Error::Write { .. } | Error::Arrow(_) | Error::Parquet(_) => ErrorKind::Write,
            Error::Config { .. } | Error::YamlParse(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Connectivity { transient, .. } => *transient,
            Error::Context { source, .. } => source.is_retryable(),
            _ => false,
        }
    }
}

/// Result type alias for the pipeline
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors without losing their kind
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Context {
            context: message.into(),
            source: Box::new(e.into()),
        })
    }
}
