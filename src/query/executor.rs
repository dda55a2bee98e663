//! SQL execution against the store.

use rusqlite::types::ValueRef;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::error;

use crate::store::Store;
use crate::types::error::{CsvqlError, Result};

/// Result of a successful query: column names plus row cells.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueryOutput {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<JsonValue>>,
}

impl QueryOutput {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Execute `sql` and return its rows.
///
/// # Errors
///
/// Returns `QueryError` carrying the offending statement when preparation or
/// stepping fails, so callers can tell a failed query apart from one that
/// matched nothing.
pub fn execute(store: &Store, sql: &str) -> Result<QueryOutput> {
    let query_err = |e: rusqlite::Error| CsvqlError::QueryError(format!("{} (sql: {})", e, sql));

    let mut stmt = store.connection().prepare(sql).map_err(query_err)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
    let column_count = columns.len();

    let mut rows = Vec::new();
    let mut raw = stmt.query([]).map_err(query_err)?;
    while let Some(row) = raw.next().map_err(query_err)? {
        let mut cells = Vec::with_capacity(column_count);
        for i in 0..column_count {
            cells.push(cell_to_json(row.get_ref(i).map_err(query_err)?));
        }
        rows.push(cells);
    }

    Ok(QueryOutput { columns, rows })
}

/// Fail-soft wrapper: log the failure with the offending SQL and return an
/// empty output. Callers that need to distinguish failure from zero matching
/// rows should use [`execute`] instead.
pub fn execute_or_empty(store: &Store, sql: &str) -> QueryOutput {
    match execute(store, sql) {
        Ok(output) => output,
        Err(e) => {
            error!(sql, error = %e, "query failed");
            QueryOutput::default()
        }
    }
}

fn cell_to_json(value: ValueRef<'_>) -> JsonValue {
    match value {
        ValueRef::Null => JsonValue::Null,
        ValueRef::Integer(i) => JsonValue::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        ValueRef::Text(t) => JsonValue::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => JsonValue::String(format!("<blob {} bytes>", b.len())),
    }
}
