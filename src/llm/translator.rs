//! Natural language to SQL translation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::LlmConfig;
use crate::schema::identifier::Identifier;
use crate::types::error::{CsvqlError, Result};

/// Seam between the pipeline and whatever turns a question into SQL.
///
/// Implementations return a single SQL statement with no surrounding prose.
/// The pipeline does not trust the result; see `query::guard`.
#[async_trait]
pub trait SqlTranslator: Send + Sync {
    async fn translate(
        &self,
        question: &str,
        table: &Identifier,
        columns: &[String],
    ) -> Result<String>;
}

/// Chat-completions response (OpenAI wire format).
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Translator backed by an OpenAI-compatible chat-completions endpoint.
///
/// Constructed once and passed by reference; requests carry a hard timeout
/// and failed calls are retried a bounded number of times.
pub struct OpenAiTranslator {
    client: Client,
    config: LlmConfig,
}

impl OpenAiTranslator {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CsvqlError::TranslatorError(format!("http client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Create from environment variables. See [`LlmConfig::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(LlmConfig::from_env()?)
    }

    /// Strip markdown code fences from a model reply.
    ///
    /// Handles ```sql ... ```, ```SQL ... ```, and bare ``` ... ```.
    fn strip_markdown(text: &str) -> &str {
        let text = text.trim();

        if text.starts_with("```") {
            let start = text.find('\n').map(|i| i + 1).unwrap_or(0);
            let end = text.rfind("```").unwrap_or(text.len());
            if start <= end {
                return text[start..end].trim();
            }
        }

        text
    }

    async fn request_sql(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&json!({
                "model": self.config.model,
                "messages": [
                    {"role": "system", "content": system_prompt},
                    {"role": "user", "content": user_prompt}
                ],
                "temperature": 0.0
            }))
            .send()
            .await
            .map_err(|e| CsvqlError::TranslatorError(format!("completion request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CsvqlError::TranslatorError(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(CsvqlError::TranslatorError(format!(
                "completion API error {}: {}",
                status, body
            )));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body).map_err(|e| {
            CsvqlError::TranslatorError(format!("failed to parse completion response: {}", e))
        })?;

        let content = &parsed
            .choices
            .first()
            .ok_or_else(|| CsvqlError::TranslatorError("no completion choices".to_string()))?
            .message
            .content;

        let sql = Self::strip_markdown(content).to_string();
        if sql.is_empty() {
            return Err(CsvqlError::TranslatorError(
                "model returned empty text".to_string(),
            ));
        }

        Ok(sql)
    }
}

#[async_trait]
impl SqlTranslator for OpenAiTranslator {
    async fn translate(
        &self,
        question: &str,
        table: &Identifier,
        columns: &[String],
    ) -> Result<String> {
        let system_prompt =
            "You translate user questions into SQL statements for SQLite. \
             Reply with exactly one executable SQL statement, no prose, no code fences.";
        let user_prompt = format!(
            "The table {table} has these columns: {columns}.\n\
             All columns are stored as TEXT; cast before numeric comparison.\n\
             Question: {question}\n\n\
             Return one SELECT statement answering the question.",
            table = table,
            columns = columns.join(", "),
            question = question,
        );

        let mut attempt = 0;
        loop {
            match self.request_sql(system_prompt, &user_prompt).await {
                Ok(sql) => {
                    debug!(%sql, "generated sql");
                    return Ok(sql);
                }
                Err(e) if attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(attempt, error = %e, "translator call failed, retrying");
                    tokio::time::sleep(self.config.retry_backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
