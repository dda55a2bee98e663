//! End-to-end orchestration: reconcile, load, translate, guard, execute.

use std::path::Path;

use tracing::info;

use crate::ingest;
use crate::llm::translator::SqlTranslator;
use crate::query::{executor, guard, QueryOutput};
use crate::schema::{identifier::Identifier, reconcile};
use crate::store::Store;
use crate::types::error::{CsvqlError, Result};

/// One run of the pipeline: owns the store handle for its whole lifetime,
/// so the connection is released on every exit path.
pub struct Pipeline {
    store: Store,
    allow_writes: bool,
}

impl Pipeline {
    /// Open (or create) the database file and wrap it in a pipeline.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        Ok(Self::with_store(Store::open(db_path)?))
    }

    pub fn with_store(store: Store) -> Self {
        Self {
            store,
            allow_writes: false,
        }
    }

    /// Let generated or raw SQL perform writes, bypassing the read-only
    /// guard. Off by default.
    pub fn allow_writes(mut self, allow: bool) -> Self {
        self.allow_writes = allow;
        self
    }

    /// Reconcile the table against the CSV's headers, then load every row.
    ///
    /// Returns the number of rows inserted. A failure here is fatal for this
    /// file; nothing is partially committed.
    pub fn import(&mut self, csv_path: &Path, table: &Identifier) -> Result<usize> {
        let columns = reconcile::reconcile(&self.store, csv_path, table)?;
        ingest::load(&mut self.store, csv_path, table, &columns)
    }

    /// Translate a question into SQL and execute it against `table`.
    ///
    /// Translator and query failures abort only this question; the store and
    /// its data stay usable for the next one.
    pub async fn ask(
        &self,
        translator: &dyn SqlTranslator,
        question: &str,
        table: &Identifier,
    ) -> Result<QueryOutput> {
        let columns = self.store.table_columns(table)?.ok_or_else(|| {
            CsvqlError::SchemaError(format!("table {} does not exist", table))
        })?;

        let sql = translator.translate(question, table, &columns).await?;
        info!(%sql, "generated sql");

        self.run_sql(&sql)
    }

    /// Execute already-written SQL, applying the read-only guard unless
    /// writes were explicitly allowed.
    pub fn run_sql(&self, sql: &str) -> Result<QueryOutput> {
        if !self.allow_writes {
            guard::ensure_read_only(sql)?;
        }
        executor::execute(&self.store, sql)
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}
