//! Configuration for the ingestion and ETL jobs.
//!
//! All settings arrive through environment variables; a missing required
//! variable is a fatal `Configuration` error raised before any network I/O.

use std::env;
use std::time::Duration;

use crate::error::EtlError;

/// Suffix appended to the project name to form the data bucket name.
pub const BUCKET_SUFFIX: &str = "-hadrian-ml-data-bucket";

/// Environment variable carrying the project name.
pub const PROJECT_NAME_VAR: &str = "TF_VAR_PROJECT_NAME";

/// Environment variable that overrides bucket-name derivation entirely.
pub const BUCKET_OVERRIDE_VAR: &str = "S3_BUCKET_NAME";

/// Database user used when `DB_USER` is not set.
pub const DEFAULT_DB_USER: &str = "admin";

/// Database port used when `DB_PORT` is not set.
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Timeout for establishing the database connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the data bucket comes from: an explicit override, or derivation
/// from the project name.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub project: Option<String>,
    pub bucket_override: Option<String>,
}

impl StorageSettings {
    pub fn from_env() -> Self {
        Self {
            project: read_non_empty(PROJECT_NAME_VAR),
            bucket_override: read_non_empty(BUCKET_OVERRIDE_VAR),
        }
    }
}

/// Connection parameters for the destination database.
#[derive(Debug, Clone)]
pub struct DbSettings {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
}

impl DbSettings {
    pub fn from_env() -> Result<Self, EtlError> {
        let port = match read_non_empty("DB_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                EtlError::Configuration(format!("DB_PORT is not a valid port number: {raw}"))
            })?,
            None => DEFAULT_DB_PORT,
        };

        Ok(Self {
            host: require("DB_HOST")?,
            port,
            database: require("DB_NAME")?,
            user: read_non_empty("DB_USER").unwrap_or_else(|| DEFAULT_DB_USER.to_string()),
            password: require("DB_PASSWORD")?,
        })
    }
}

fn require(name: &str) -> Result<String, EtlError> {
    read_non_empty(name)
        .ok_or_else(|| EtlError::Configuration(format!("{name} environment variable is not set")))
}

/// Treat empty values the same as unset ones.
fn read_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
