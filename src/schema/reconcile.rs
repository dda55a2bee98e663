//! CSV-to-table schema reconciliation.
//!
//! Ensures the target table's columns are a superset of the CSV's normalized
//! headers, in header order. Creates the table when absent, adds missing
//! columns when present. Columns are never removed, renamed, or retyped.

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::schema::identifier::Identifier;
use crate::store::Store;
use crate::types::error::{CsvqlError, Result};

/// Read the header row of a CSV file and normalize every header.
///
/// # Errors
///
/// Returns `SchemaError` if the file cannot be read, a header normalizes to
/// an empty identifier, two headers collide after normalization, or the
/// header row is empty.
pub fn read_headers(csv_path: &Path) -> Result<Vec<Identifier>> {
    let mut reader = csv::Reader::from_path(csv_path).map_err(|e| {
        CsvqlError::SchemaError(format!("cannot open {}: {}", csv_path.display(), e))
    })?;
    let headers = reader.headers().map_err(|e| {
        CsvqlError::SchemaError(format!("cannot read header of {}: {}", csv_path.display(), e))
    })?;

    let mut seen = HashSet::new();
    let mut columns = Vec::with_capacity(headers.len());
    for raw in headers.iter() {
        let column = Identifier::normalize(raw)?;
        if !seen.insert(column.clone()) {
            return Err(CsvqlError::SchemaError(format!(
                "duplicate column {} after normalizing header {:?}",
                column, raw
            )));
        }
        columns.push(column);
    }

    if columns.is_empty() {
        return Err(CsvqlError::SchemaError(format!(
            "{} has no header columns",
            csv_path.display()
        )));
    }

    Ok(columns)
}

/// Ensure `table` exists with at least the CSV's columns.
///
/// Returns the confirmed header list for the loader. Running this twice
/// against an already-matching table changes nothing.
pub fn reconcile(store: &Store, csv_path: &Path, table: &Identifier) -> Result<Vec<Identifier>> {
    let columns = read_headers(csv_path)?;

    match store.table_columns(table)? {
        None => {
            store.create_table(table, &columns)?;
            info!(table = %table, columns = columns.len(), "created table");
        }
        Some(existing) => {
            let existing: HashSet<String> = existing.into_iter().collect();
            for column in &columns {
                if !existing.contains(column.as_str()) {
                    store.add_column(table, column)?;
                    info!(table = %table, column = %column, "added column");
                }
            }
        }
    }

    Ok(columns)
}
