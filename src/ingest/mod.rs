//! CSV row loading.

use std::path::Path;

use tracing::info;

use crate::schema::identifier::Identifier;
use crate::store::Store;
use crate::types::error::{CsvqlError, Result};

/// Insert every data row of `csv_path` into `table`, returning the count.
///
/// Values are located by normalizing the CSV's own header row with the same
/// constructor used for DDL, so lookup keys and column names cannot drift
/// apart. A record shorter than the header yields NULL for the columns it
/// does not cover. The whole file commits in one transaction.
pub fn load(
    store: &mut Store,
    csv_path: &Path,
    table: &Identifier,
    columns: &[Identifier],
) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(csv_path)
        .map_err(|e| {
            CsvqlError::SchemaError(format!("cannot open {}: {}", csv_path.display(), e))
        })?;

    // Map each target column to its position in this file's header row.
    // A column the file does not carry maps to None and loads as NULL.
    let headers = reader
        .headers()
        .map_err(|e| {
            CsvqlError::SchemaError(format!(
                "cannot read header of {}: {}",
                csv_path.display(),
                e
            ))
        })?
        .clone();
    let positions: Vec<Option<usize>> = columns
        .iter()
        .map(|column| {
            headers.iter().enumerate().find_map(|(i, raw)| {
                match Identifier::normalize(raw) {
                    Ok(normalized) if normalized == *column => Some(i),
                    _ => None,
                }
            })
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Option<String>> = positions
            .iter()
            .map(|position| {
                position
                    .and_then(|i| record.get(i))
                    .map(str::to_string)
            })
            .collect();
        rows.push(row);
    }

    let inserted = store.insert_rows(table, columns, &rows)?;
    info!(table = %table, rows = inserted, "csv load committed");
    Ok(inserted)
}
