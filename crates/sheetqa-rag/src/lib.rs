//! SheetQA RAG - answer questions from spreadsheet rows
//!
//! Implements the linear ask flow:
//! 1. Resolve the sheet reference (request overrides, then config defaults)
//! 2. Fetch rows from the tabular source
//! 3. Select the row window
//! 4. Render it as CSV and build the prompt
//! 5. Call the language model and return its first candidate

pub mod csv;
pub mod llm;
pub mod prompt;
pub mod window;

pub use csv::render_csv;
pub use llm::{create_llm_client, OllamaClient, OpenAiClient};
pub use prompt::{build_messages, build_user_message, INSUFFICIENT_DATA, SYSTEM_PROMPT};
pub use window::select_row_window;

use sheetqa_core::{
    AppConfig, ChatRequest, LlmClient, Result, RowTable, SheetQaError, SheetReference,
    TabularSource,
};
use std::sync::Arc;

/// Settings for the ask flow
#[derive(Debug, Clone)]
pub struct AnswerConfig {
    /// Spreadsheet used when the request names none
    pub default_spreadsheet_id: Option<String>,
    /// Range used when the request names none
    pub default_range: String,
    /// Row-window threshold (header included)
    pub max_rows: usize,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

impl AnswerConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            default_spreadsheet_id: config.sheets.default_spreadsheet_id.clone(),
            default_range: config.sheets.default_range.clone(),
            max_rows: config.sheets.max_rows,
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        }
    }
}

/// One question, with optional sheet overrides
#[derive(Debug, Clone, Default)]
pub struct AskInput {
    pub question: String,
    pub spreadsheet_id: Option<String>,
    pub range: Option<String>,
}

impl AskInput {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }
}

/// Answers questions from a spreadsheet window via a language model
pub struct SheetQuestionAnswerer {
    source: Arc<dyn TabularSource>,
    llm: Arc<dyn LlmClient>,
    config: AnswerConfig,
}

impl SheetQuestionAnswerer {
    pub fn new(
        source: Arc<dyn TabularSource>,
        llm: Arc<dyn LlmClient>,
        config: AnswerConfig,
    ) -> Self {
        Self {
            source,
            llm,
            config,
        }
    }

    /// Effective sheet reference; blank overrides fall back to defaults
    pub fn resolve_sheet(&self, input: &AskInput) -> Result<SheetReference> {
        let spreadsheet_id = non_blank(input.spreadsheet_id.as_deref())
            .or_else(|| non_blank(self.config.default_spreadsheet_id.as_deref()))
            .ok_or_else(|| {
                SheetQaError::UpstreamFetch("No spreadsheet id provided or configured".to_string())
            })?;

        let range = non_blank(input.range.as_deref()).unwrap_or(&self.config.default_range);

        Ok(SheetReference::new(spreadsheet_id, range))
    }

    /// Window, render and wrap `table` into a chat request
    pub fn build_request(&self, table: RowTable, question: &str) -> ChatRequest {
        let window = select_row_window(table, self.config.max_rows);
        let csv = render_csv(&window);

        ChatRequest {
            model: self.config.model.clone(),
            messages: build_messages(&csv, question),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// Run the full ask flow.
    ///
    /// Returns `Ok(None)` when the model produced no content.
    pub async fn answer(&self, input: &AskInput) -> Result<Option<String>> {
        if input.question.trim().is_empty() {
            return Err(SheetQaError::Validation("Missing question".to_string()));
        }

        let sheet = self.resolve_sheet(input)?;
        let table = self.source.fetch_rows(&sheet).await?;
        let fetched = table.len();

        let request = self.build_request(table, &input.question);

        tracing::info!(
            spreadsheet_id = %sheet.spreadsheet_id,
            range = %sheet.range,
            fetched_rows = fetched,
            sent_rows = fetched.min(self.config.max_rows),
            model = %request.model,
            "Asking model"
        );

        let answer = self.llm.complete(&request).await?;

        if answer.is_none() {
            tracing::warn!("Model returned no content");
        }

        Ok(answer)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
