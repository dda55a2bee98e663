//! Error types for the csvql pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CsvqlError>;

#[derive(Error, Debug)]
pub enum CsvqlError {
    /// The store could not be opened. Fatal for the whole run.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// CSV unreadable, DDL rejected, or a header produced an unusable
    /// identifier. Fatal for that file's ingestion.
    #[error("Schema error: {0}")]
    SchemaError(String),

    /// A SQL statement failed to execute or was rejected by the read-only
    /// guard. Aborts only the current query.
    #[error("Query error: {0}")]
    QueryError(String),

    /// The completion call failed, timed out after retries, or returned
    /// unusable text. Aborts only the current question.
    #[error("Translator error: {0}")]
    TranslatorError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
