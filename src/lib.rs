//! csvql - natural language queries over CSV data, backed by SQLite.
//!
//! The pipeline loads CSV files into a local SQLite table, creating the
//! table from the normalized headers or extending it with additive columns
//! when the shape changed, then asks a language model to translate a
//! question into SQL and executes the result behind a read-only guard.

pub mod config;
pub mod ingest;
pub mod llm;
pub mod pipeline;
pub mod query;
pub mod schema;
pub mod store;
pub mod types;

pub use pipeline::Pipeline;
pub use query::QueryOutput;
pub use schema::Identifier;
pub use store::Store;
pub use types::{CsvqlError, Result};
