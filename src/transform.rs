//! Row normalization before load: CSV parsing and the per-column uppercase
//! transform.

use crate::error::EtlError;

/// One parsed row; fields are positional against `Dataset::columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub fields: Vec<String>,
}

/// Header names plus rows in input order.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl Dataset {
    /// Parse UTF-8 comma-delimited text; the first row names the columns.
    /// Ragged or otherwise malformed input is a schema error.
    pub fn parse_csv(bytes: &[u8]) -> Result<Self, EtlError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes);

        let columns = reader
            .headers()
            .map_err(|err| EtlError::Schema(format!("invalid CSV header: {err}")))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let record =
                result.map_err(|err| EtlError::Schema(format!("invalid CSV record: {err}")))?;
            records.push(Record {
                fields: record.iter().map(str::to_string).collect(),
            });
        }

        Ok(Self { columns, records })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Uppercase every value of the designated column. Pure with respect to
    /// the rest of the row; other columns are never touched.
    pub fn uppercase_column(&mut self, column: &str) -> Result<(), EtlError> {
        let index = self.column_index(column).ok_or_else(|| {
            EtlError::Schema(format!("column '{column}' not present in header"))
        })?;

        for record in &mut self.records {
            if let Some(field) = record.fields.get_mut(index) {
                *field = field.to_uppercase();
            }
        }
        Ok(())
    }
}
