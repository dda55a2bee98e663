//! SQLite storage wrapper.
//!
//! One exclusive file-backed connection per run, opened at startup and
//! released when the `Store` drops, on success and failure paths alike.
//! Identifiers are quoted into statement text; row values are always bound
//! as parameters.

use std::path::Path;

use rusqlite::{params_from_iter, Connection};

use crate::schema::identifier::Identifier;
use crate::types::error::{CsvqlError, Result};

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref()).map_err(|e| {
            CsvqlError::ConnectionError(format!(
                "cannot open {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(Self { conn })
    }

    /// In-memory store, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CsvqlError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Column names of `table` in declaration order, or `None` when the
    /// table does not exist. An absent table is distinct from an empty one.
    pub fn table_columns(&self, table: &Identifier) -> Result<Option<Vec<String>>> {
        let pragma = format!("PRAGMA table_info({})", table.quoted());
        let mut stmt = self
            .conn
            .prepare(&pragma)
            .map_err(|e| CsvqlError::SchemaError(format!("{}: {}", pragma, e)))?;

        let columns = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .and_then(|rows| rows.collect::<std::result::Result<Vec<_>, _>>())
            .map_err(|e| CsvqlError::SchemaError(format!("{}: {}", pragma, e)))?;

        if columns.is_empty() {
            Ok(None)
        } else {
            Ok(Some(columns))
        }
    }

    /// Create `table` with one TEXT column per identifier, in order.
    pub fn create_table(&self, table: &Identifier, columns: &[Identifier]) -> Result<()> {
        let column_defs = columns
            .iter()
            .map(|c| format!("{} TEXT", c.quoted()))
            .collect::<Vec<_>>()
            .join(", ");
        let ddl = format!("CREATE TABLE {} ({})", table.quoted(), column_defs);

        self.conn
            .execute(&ddl, [])
            .map_err(|e| CsvqlError::SchemaError(format!("{}: {}", ddl, e)))?;
        Ok(())
    }

    /// Add a TEXT column to an existing table. Existing rows get NULL.
    pub fn add_column(&self, table: &Identifier, column: &Identifier) -> Result<()> {
        let ddl = format!(
            "ALTER TABLE {} ADD COLUMN {} TEXT",
            table.quoted(),
            column.quoted()
        );

        self.conn
            .execute(&ddl, [])
            .map_err(|e| CsvqlError::SchemaError(format!("{}: {}", ddl, e)))?;
        Ok(())
    }

    /// Insert rows in a single transaction, all-or-nothing.
    ///
    /// Each row must have one `Option<String>` per column; `None` binds NULL.
    pub fn insert_rows(
        &mut self,
        table: &Identifier,
        columns: &[Identifier],
        rows: &[Vec<Option<String>>],
    ) -> Result<usize> {
        let column_list = columns
            .iter()
            .map(Identifier::quoted)
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=columns.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let insert = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.quoted(),
            column_list,
            placeholders
        );

        let tx = self
            .conn
            .transaction()
            .map_err(|e| CsvqlError::SchemaError(format!("begin transaction: {}", e)))?;
        {
            let mut stmt = tx
                .prepare(&insert)
                .map_err(|e| CsvqlError::SchemaError(format!("{}: {}", insert, e)))?;
            for row in rows {
                stmt.execute(params_from_iter(row.iter()))
                    .map_err(|e| CsvqlError::SchemaError(format!("{}: {}", insert, e)))?;
            }
        }
        tx.commit()
            .map_err(|e| CsvqlError::SchemaError(format!("commit: {}", e)))?;

        Ok(rows.len())
    }

    /// Raw connection access for the query executor.
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Identifier {
        Identifier::normalize(s).unwrap()
    }

    #[test]
    fn test_table_columns_absent_table() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.table_columns(&ident("missing")).unwrap().is_none());
    }

    #[test]
    fn test_create_table_and_list_columns() {
        let store = Store::open_in_memory().unwrap();
        let table = ident("people");
        store
            .create_table(&table, &[ident("name"), ident("age")])
            .unwrap();

        let columns = store.table_columns(&table).unwrap().unwrap();
        assert_eq!(columns, vec!["name", "age"]);
    }

    #[test]
    fn test_insert_rows_binds_null_for_missing() {
        let mut store = Store::open_in_memory().unwrap();
        let table = ident("people");
        let columns = vec![ident("name"), ident("age")];
        store.create_table(&table, &columns).unwrap();

        let rows = vec![
            vec![Some("Alice".to_string()), Some("30".to_string())],
            vec![Some("Bob".to_string()), None],
        ];
        let inserted = store.insert_rows(&table, &columns, &rows).unwrap();
        assert_eq!(inserted, 2);

        let nulls: i64 = store
            .connection()
            .query_row("SELECT COUNT(*) FROM people WHERE age IS NULL", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(nulls, 1);
    }
}
