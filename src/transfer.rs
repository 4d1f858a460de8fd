//! Moves exactly one object between local storage and the remote store.

use crate::error::EtlError;
use crate::store::ObjectStore;

/// How an upload concluded. Skipping an already-present object is a success
/// path so the caller can exit zero without re-uploading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    SkippedExisting,
}

/// Unconditional upload; overwrites any existing object under the key.
pub async fn upload(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    bytes: Vec<u8>,
) -> Result<(), EtlError> {
    let size = bytes.len();
    store.put(bucket, key, bytes).await?;
    tracing::info!(bucket, key, size, "uploaded object");
    Ok(())
}

/// Upload variant that probes first and refuses to overwrite. A probe
/// failure propagates; only a definite "not present" leads to a put.
pub async fn upload_if_absent(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    bytes: Vec<u8>,
) -> Result<UploadOutcome, EtlError> {
    if store.exists(bucket, key).await? {
        tracing::info!(bucket, key, "object already present, skipping upload");
        return Ok(UploadOutcome::SkippedExisting);
    }
    upload(store, bucket, key, bytes).await?;
    Ok(UploadOutcome::Uploaded)
}

/// Fetch the full object content into memory. No chunking or streaming -
/// suitable only for small files.
pub async fn download(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
) -> Result<Vec<u8>, EtlError> {
    let bytes = store.get(bucket, key).await?;
    tracing::info!(bucket, key, size = bytes.len(), "downloaded object");
    Ok(bytes)
}
