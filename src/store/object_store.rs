use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::EtlError;

/// Key and last-modified timestamp of one stored object.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// Minimal object-store surface consumed by the pipeline.
///
/// Credentials and endpoint resolution are ambient concerns of the backend.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store an object, overwriting any existing one under the same key.
    async fn put(&self, bucket: &str, key: &str, bytes: Vec<u8>) -> Result<(), EtlError>;

    /// Fetch the full object content into memory. No streaming - suitable
    /// only for small files.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, EtlError>;

    /// Probe for an object without retrieving content. Returns `false` when
    /// the object is not present; any other failure (e.g. access denied)
    /// propagates as an error and must not be treated as "not present".
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, EtlError>;

    /// List every object in the bucket with its last-modified timestamp.
    async fn list(&self, bucket: &str) -> Result<Vec<ObjectInfo>, EtlError>;
}
