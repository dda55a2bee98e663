//! Language-model integration.

pub mod translator;

pub use translator::{OpenAiTranslator, SqlTranslator};
