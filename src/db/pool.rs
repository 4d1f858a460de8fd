//! Database handle that is Postgres in production and in-memory SQLite in
//! tests, so load semantics can be exercised without a live cluster.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::config::{CONNECT_TIMEOUT, DbSettings};
use crate::error::EtlError;

#[derive(Debug, Clone)]
enum DbInner {
    Postgres(sqlx::PgPool),
    #[cfg(test)]
    Sqlite(sqlx::SqlitePool),
}

/// Wraps the backend pools behind one executor surface.
#[derive(Debug, Clone)]
pub struct Db {
    inner: DbInner,
}

impl Db {
    pub async fn connect(settings: &DbSettings) -> Result<Self, EtlError> {
        let options = PgConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .database(&settings.database)
            .username(&settings.user)
            .password(&settings.password);

        // A single sequential job needs exactly one connection.
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(CONNECT_TIMEOUT)
            .connect_with(options)
            .await?;

        tracing::info!(
            host = %settings.host,
            database = %settings.database,
            "connected to database"
        );

        Ok(Self {
            inner: DbInner::Postgres(pool),
        })
    }

    /// Create an in-memory SQLite pool for testing
    #[cfg(test)]
    pub async fn sqlite_in_memory() -> Result<Self, sqlx::Error> {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Ok(Self {
            inner: DbInner::Sqlite(pool),
        })
    }

    /// Whether statements use numbered (`$1`) or positional (`?`) binds.
    pub fn numbered_placeholders(&self) -> bool {
        match &self.inner {
            DbInner::Postgres(_) => true,
            #[cfg(test)]
            DbInner::Sqlite(_) => false,
        }
    }

    /// Execute a statement without bind parameters (DDL).
    pub async fn execute(&self, sql: &str) -> Result<(), sqlx::Error> {
        match &self.inner {
            DbInner::Postgres(pool) => {
                sqlx::query(sql).execute(pool).await?;
            }
            #[cfg(test)]
            DbInner::Sqlite(pool) => {
                sqlx::query(sql).execute(pool).await?;
            }
        }
        Ok(())
    }

    /// Run the same parameterized statement once per row inside a single
    /// transaction with one commit after the last row. A failure on any row
    /// rolls back the whole batch.
    pub async fn execute_batch(&self, sql: &str, rows: &[Vec<&str>]) -> Result<u64, sqlx::Error> {
        let mut applied = 0u64;
        match &self.inner {
            DbInner::Postgres(pool) => {
                let mut tx = pool.begin().await?;
                for row in rows {
                    let mut query = sqlx::query(sql);
                    for value in row {
                        query = query.bind(*value);
                    }
                    query.execute(&mut *tx).await?;
                    applied += 1;
                }
                tx.commit().await?;
            }
            #[cfg(test)]
            DbInner::Sqlite(pool) => {
                let mut tx = pool.begin().await?;
                for row in rows {
                    let mut query = sqlx::query(sql);
                    for value in row {
                        query = query.bind(*value);
                    }
                    query.execute(&mut *tx).await?;
                    applied += 1;
                }
                tx.commit().await?;
            }
        }
        Ok(applied)
    }

    /// Direct access to the SQLite pool for test assertions.
    #[cfg(test)]
    pub fn sqlite_pool(&self) -> &sqlx::SqlitePool {
        match &self.inner {
            DbInner::Sqlite(pool) => pool,
            _ => panic!("not a SQLite-backed Db"),
        }
    }
}
