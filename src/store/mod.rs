//! Object store client module
//!
//! Lists and fetches raw extract snapshots.
//!
//! # Overview
//!
//! The pipeline only needs two capabilities from storage, captured by the
//! [`ObjectStoreClient`] trait:
//! - `list(bucket, prefix)` - enumerate object keys
//! - `get(bucket, key)` - fetch object bytes
//!
//! [`StoreClient`] implements them for S3-compatible servers and local
//! directories; [`RetryingClient`] adds bounded retry-with-backoff on top of
//! any implementation.

mod client;
mod retry;
mod types;

pub use client::StoreClient;
pub use retry::RetryingClient;
pub use types::ObjectStoreClient;
