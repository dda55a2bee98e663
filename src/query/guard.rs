//! Read-only statement guard for generated SQL.
//!
//! The translator's output is untrusted text. Before execution it must parse
//! as exactly one SELECT statement; everything else is rejected unless the
//! caller explicitly allows writes.

use sqlparser::ast::Statement;
use sqlparser::dialect::SQLiteDialect;
use sqlparser::parser::Parser;

use crate::types::error::{CsvqlError, Result};

/// Check that `sql` is a single SELECT statement.
pub fn ensure_read_only(sql: &str) -> Result<()> {
    let statements = Parser::parse_sql(&SQLiteDialect {}, sql)
        .map_err(|e| CsvqlError::QueryError(format!("unparsable sql: {} ({})", sql, e)))?;

    match statements.as_slice() {
        [Statement::Query(_)] => Ok(()),
        [] => Err(CsvqlError::QueryError(format!("empty statement: {}", sql))),
        [_] => Err(CsvqlError::QueryError(format!(
            "refusing non-SELECT statement: {}",
            sql
        ))),
        _ => Err(CsvqlError::QueryError(format!(
            "expected a single statement, got {}: {}",
            statements.len(),
            sql
        ))),
    }
}
