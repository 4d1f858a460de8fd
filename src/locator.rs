//! Computes where data lives: bucket name derivation, object key naming,
//! and latest-object selection.

use chrono::{DateTime, Utc};

use crate::config::{BUCKET_SUFFIX, PROJECT_NAME_VAR, StorageSettings};
use crate::error::EtlError;
use crate::store::ObjectStore;

/// Resolve the data bucket: an explicit override wins, otherwise the name is
/// derived from the project name. Fails before any I/O when neither is set.
pub fn bucket_name(settings: &StorageSettings) -> Result<String, EtlError> {
    if let Some(bucket) = &settings.bucket_override {
        return Ok(bucket.clone());
    }
    match &settings.project {
        Some(project) => Ok(format!("{project}{BUCKET_SUFFIX}")),
        None => Err(EtlError::Configuration(format!(
            "{PROJECT_NAME_VAR} environment variable is not set"
        ))),
    }
}

/// Object key for a fresh upload: `data_{YYYYmmdd_HHMMSS}.csv`.
pub fn timestamped_key(now: DateTime<Utc>) -> String {
    format!("data_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Select the most recently modified object in the bucket. Read-only: the
/// single listing call is the only side effect.
pub async fn latest_key(store: &dyn ObjectStore, bucket: &str) -> Result<String, EtlError> {
    let objects = store.list(bucket).await?;
    objects
        .into_iter()
        .max_by_key(|object| object.last_modified)
        .map(|object| object.key)
        .ok_or_else(|| EtlError::NotFound(format!("bucket {bucket} has no objects")))
}
