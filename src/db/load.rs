//! Load stage: ensure the destination table, then upsert every row in one
//! transaction.

use crate::db::pool::Db;
use crate::db::schema;
use crate::error::EtlError;
use crate::transform::Dataset;

/// Persist the dataset into `table`, keyed by `key`. The table is created if
/// absent; each row is a single-statement upsert, all applied inside one
/// transaction committed once after the last row. A missing key column is a
/// schema error raised before any database write.
pub async fn load_dataset(
    db: &Db,
    table: &str,
    key: &str,
    dataset: &Dataset,
) -> Result<u64, EtlError> {
    if dataset.column_index(key).is_none() {
        return Err(EtlError::Schema(format!(
            "key column '{key}' not present in header"
        )));
    }

    schema::ensure_table(db, table, key, &dataset.columns).await?;

    if dataset.records.is_empty() {
        tracing::info!(table, "no rows to load");
        return Ok(0);
    }

    let sql = schema::upsert_sql(table, key, &dataset.columns, db.numbered_placeholders())?;
    let rows: Vec<Vec<&str>> = dataset
        .records
        .iter()
        .map(|record| record.fields.iter().map(String::as_str).collect())
        .collect();

    let applied = db.execute_batch(&sql, &rows).await?;
    tracing::info!(table, rows = applied, "load complete");
    Ok(applied)
}
