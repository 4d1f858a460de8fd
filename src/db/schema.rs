//! DDL and upsert statement generation for the destination table.
//!
//! Every ingested value is stored as TEXT; the key column carries the
//! primary key that the upsert's conflict clause resolves on.

use crate::db::pool::Db;
use crate::error::EtlError;

/// Quote an identifier. Names containing a double quote are rejected rather
/// than escaped; they never occur in well-formed headers.
fn quote_ident(name: &str) -> Result<String, EtlError> {
    if name.is_empty() || name.contains('"') {
        return Err(EtlError::Schema(format!("invalid identifier: {name:?}")));
    }
    Ok(format!("\"{name}\""))
}

/// Idempotent create-table statement for the destination relation.
pub fn create_table_ddl(table: &str, key: &str, columns: &[String]) -> Result<String, EtlError> {
    let mut defs = Vec::with_capacity(columns.len());
    for column in columns {
        let quoted = quote_ident(column)?;
        if column == key {
            defs.push(format!("{quoted} TEXT PRIMARY KEY"));
        } else {
            defs.push(format!("{quoted} TEXT"));
        }
    }

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        quote_ident(table)?,
        defs.join(", ")
    ))
}

/// Single-statement upsert: insert, or overwrite all non-key columns when
/// the key already exists. Atomic per row; no read-then-write.
pub fn upsert_sql(
    table: &str,
    key: &str,
    columns: &[String],
    numbered: bool,
) -> Result<String, EtlError> {
    let quoted: Vec<String> = columns
        .iter()
        .map(|column| quote_ident(column))
        .collect::<Result<_, _>>()?;

    let placeholders: Vec<String> = (1..=columns.len())
        .map(|i| {
            if numbered {
                format!("${i}")
            } else {
                "?".to_string()
            }
        })
        .collect();

    let updates: Vec<String> = columns
        .iter()
        .zip(&quoted)
        .filter(|(column, _)| column.as_str() != key)
        .map(|(_, quoted)| format!("{quoted} = excluded.{quoted}"))
        .collect();

    let conflict = if updates.is_empty() {
        format!("ON CONFLICT ({}) DO NOTHING", quote_ident(key)?)
    } else {
        format!(
            "ON CONFLICT ({}) DO UPDATE SET {}",
            quote_ident(key)?,
            updates.join(", ")
        )
    };

    Ok(format!(
        "INSERT INTO {} ({}) VALUES ({}) {}",
        quote_ident(table)?,
        quoted.join(", "),
        placeholders.join(", "),
        conflict
    ))
}

/// Ensure the destination table exists. Safe to call repeatedly; only the
/// first call has any effect.
pub async fn ensure_table(
    db: &Db,
    table: &str,
    key: &str,
    columns: &[String],
) -> Result<(), EtlError> {
    let ddl = create_table_ddl(table, key, columns)?;
    db.execute(&ddl).await?;
    Ok(())
}
