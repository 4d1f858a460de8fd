//! High-level entry points for the two jobs.
//!
//! `run_ingest` uploads one local CSV to the project data bucket;
//! `run_etl` locates the latest object, applies the uppercase transform, and
//! upserts the rows into the destination table. Both resolve configuration
//! before touching the network, and both are strictly sequential.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;

use crate::config::{DbSettings, StorageSettings};
use crate::db::{self, Db};
use crate::error::EtlError;
use crate::locator;
use crate::store::{ObjectStore, S3ObjectStore};
use crate::transfer;
use crate::transform::Dataset;

pub use crate::transfer::UploadOutcome;

/// Arguments for uploading one local CSV file.
#[derive(Default)]
pub struct IngestArgs {
    /// Path to the local CSV file.
    pub file: PathBuf,
    /// Explicit object key; a timestamped key is generated when absent.
    pub key: Option<String>,
    /// Probe first and refuse to overwrite an existing object.
    pub skip_existing: bool,

    // Test-only: inject a store double instead of a real S3 client
    #[cfg(test)]
    pub test_store: Option<Arc<dyn ObjectStore>>,
}

/// Result of a completed ingest.
#[derive(Debug)]
pub struct IngestReport {
    pub bucket: String,
    pub key: String,
    pub outcome: UploadOutcome,
}

/// Arguments for the transform-and-load job.
#[derive(Default)]
pub struct EtlArgs {
    /// Explicit object key; the most recently modified object is used when
    /// absent.
    pub key: Option<String>,
    /// Destination table.
    pub table: String,
    /// Column whose values are uppercased.
    pub column: String,
    /// Primary-key column the upsert resolves conflicts on.
    pub key_column: String,

    // Test-only: inject doubles instead of real S3 / Postgres clients
    #[cfg(test)]
    pub test_store: Option<Arc<dyn ObjectStore>>,
    #[cfg(test)]
    pub test_db: Option<Db>,
}

/// Result of a completed ETL run.
#[derive(Debug)]
pub struct EtlReport {
    pub bucket: String,
    pub key: String,
    pub table: String,
    pub rows_loaded: u64,
    pub duration: Duration,
}

/// Upload a local CSV to the project data bucket.
///
/// Configuration and the local-file check happen before any store call, so a
/// missing project name or file fails with zero network I/O.
pub async fn run_ingest(args: IngestArgs) -> Result<IngestReport, EtlError> {
    let storage = StorageSettings::from_env();
    let bucket = locator::bucket_name(&storage)?;

    let file_present = tokio::fs::try_exists(&args.file)
        .await
        .with_context(|| format!("failed to check {}", args.file.display()))?;
    if !file_present {
        return Err(EtlError::NotFound(format!(
            "{} not found in the current directory",
            args.file.display()
        )));
    }

    let key = match args.key {
        Some(key) => key,
        None => locator::timestamped_key(Utc::now()),
    };

    let bytes = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    #[cfg(test)]
    let store: Arc<dyn ObjectStore> = match args.test_store {
        Some(store) => store,
        None => Arc::new(S3ObjectStore::from_env().await),
    };
    #[cfg(not(test))]
    let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::from_env().await);

    let outcome = if args.skip_existing {
        transfer::upload_if_absent(store.as_ref(), &bucket, &key, bytes).await?
    } else {
        transfer::upload(store.as_ref(), &bucket, &key, bytes).await?;
        UploadOutcome::Uploaded
    };

    Ok(IngestReport {
        bucket,
        key,
        outcome,
    })
}

/// Fetch, transform, and load one object into the destination table.
pub async fn run_etl(args: EtlArgs) -> Result<EtlReport, EtlError> {
    let started = Instant::now();

    // Resolve all configuration up front; a missing variable aborts before
    // any store or database call.
    let storage = StorageSettings::from_env();
    let bucket = locator::bucket_name(&storage)?;

    #[cfg(test)]
    let db_settings = if args.test_db.is_none() {
        Some(DbSettings::from_env()?)
    } else {
        None
    };
    #[cfg(not(test))]
    let db_settings = DbSettings::from_env()?;

    #[cfg(test)]
    let store: Arc<dyn ObjectStore> = match args.test_store {
        Some(store) => store,
        None => Arc::new(S3ObjectStore::from_env().await),
    };
    #[cfg(not(test))]
    let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::from_env().await);

    let key = match args.key {
        Some(key) => key,
        None => locator::latest_key(store.as_ref(), &bucket).await?,
    };

    let bytes = transfer::download(store.as_ref(), &bucket, &key).await?;

    let mut dataset = Dataset::parse_csv(&bytes)?;
    dataset.uppercase_column(&args.column)?;

    #[cfg(test)]
    let database = match args.test_db {
        Some(database) => database,
        None => Db::connect(&db_settings.expect("resolved above")).await?,
    };
    #[cfg(not(test))]
    let database = Db::connect(&db_settings).await?;

    let rows_loaded = db::load_dataset(&database, &args.table, &args.key_column, &dataset).await?;

    Ok(EtlReport {
        bucket,
        key,
        table: args.table,
        rows_loaded,
        duration: started.elapsed(),
    })
}
