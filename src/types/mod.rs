//! Shared types for the csvql pipeline.

pub mod error;

pub use error::{CsvqlError, Result};
