//! Validated SQL identifiers derived from CSV headers.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::types::error::{CsvqlError, Result};

fn non_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\W+").expect("static pattern"))
}

/// A table or column name safe to embed in DDL/DML text.
///
/// `normalize` is the only way to construct one: whitespace is trimmed and
/// every run of non-word characters collapses to a single underscore, so the
/// result contains only word characters and underscores. Same input, same
/// identifier, run to run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Normalize a raw header or table name into an identifier.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError` if the input normalizes to an empty string.
    pub fn normalize(raw: &str) -> Result<Self> {
        let normalized = non_word().replace_all(raw.trim(), "_").into_owned();

        if normalized.is_empty() {
            return Err(CsvqlError::SchemaError(format!(
                "header {:?} normalizes to an empty identifier",
                raw
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Double-quoted form for interpolation into SQL statements.
    pub fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
