//! SheetQA Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout SheetQA:
//! - Row tables and sheet references
//! - Chat messages exchanged with the language model
//! - Common error types
//! - Collaborator traits (tabular source, identity, LLM)
//! - Configuration management

pub mod config;

pub use config::{
    AppConfig, ConfigError, LlmConfig, LlmProvider, LoggingConfig, ServerConfig, SheetsConfig,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for SheetQA operations
///
/// The set is closed: every failure in the ask flow is one of these kinds,
/// and the HTTP layer maps each kind to a fixed status code.
#[derive(Error, Debug)]
pub enum SheetQaError {
    /// Caller supplied an unusable request
    #[error("{0}")]
    Validation(String),

    /// Identity, credential or spreadsheet read failure
    #[error("Sheet fetch failed: {0}")]
    UpstreamFetch(String),

    /// Language model call failed or returned an unreadable response
    #[error("Model invocation failed: {0}")]
    ModelInvocation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SheetQaError>;

// ============================================================================
// Tabular data
// ============================================================================

/// A single spreadsheet cell. `None` stands for an absent/null value.
pub type Cell = Option<String>;

/// One spreadsheet row
pub type Row = Vec<Cell>;

/// Ordered rows as returned by a tabular source.
///
/// The first row is treated as the header. Row order is whatever the
/// source returned and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowTable {
    rows: Vec<Row>,
}

impl RowTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Build a table where every cell is present
    pub fn from_text<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Header row, if the table has any rows
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}

impl From<Vec<Row>> for RowTable {
    fn from(rows: Vec<Row>) -> Self {
        Self::new(rows)
    }
}

/// Spreadsheet id plus A1-notation range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetReference {
    pub spreadsheet_id: String,
    pub range: String,
}

impl SheetReference {
    pub fn new(spreadsheet_id: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }
}

// ============================================================================
// Chat messages
// ============================================================================

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
}

/// Role-tagged message sent to a language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// A complete chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model identifier
    pub model: String,
    /// Messages in conversation order
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
}

// ============================================================================
// Traits
// ============================================================================

/// Source of spreadsheet rows
#[async_trait::async_trait]
pub trait TabularSource: Send + Sync {
    /// Fetch every row in the referenced range.
    ///
    /// An empty or missing range yields an empty table, not an error.
    async fn fetch_rows(&self, sheet: &SheetReference) -> Result<RowTable>;
}

/// Provider of bearer tokens for the tabular source
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Obtain an access token usable as `Authorization: Bearer <token>`
    async fn access_token(&self) -> Result<String>;
}

/// Trait for LLM clients
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Run a chat completion and return the first candidate's content.
    ///
    /// `Ok(None)` means the model answered without any content.
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>>;
}

// ============================================================================
// Tests
// ============================================================================
