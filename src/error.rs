use thiserror::Error;

/// Failure classes surfaced by the pipeline stages.
///
/// Every stage propagates to the top-level runner; nothing is retried. The
/// "object already exists, skip upload" outcome is not represented here
/// because it is a success path, not an error.
#[derive(Debug, Error)]
pub enum EtlError {
    /// A required setting is missing or invalid. Raised before any I/O.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A local file or expected remote object is absent.
    #[error("not found: {0}")]
    NotFound(String),

    /// The object store failed a put/get/head/list call.
    #[error("transfer error: {0:#}")]
    Transfer(#[from] anyhow::Error),

    /// The input is missing an expected column or is not valid CSV.
    #[error("schema error: {0}")]
    Schema(String),

    /// A database DDL or DML statement failed. Aborts the remaining rows.
    #[error("load error: {0}")]
    Load(#[from] sqlx::Error),
}
