//! SheetQA Configuration Management
//!
//! Handles configuration from environment variables, config files,
//! and command-line arguments with sensible defaults for development.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default range read when the request does not name one
pub const DEFAULT_RANGE: &str = "Sales!A1:D500";

/// Row count above which the row window is truncated
pub const DEFAULT_MAX_ROWS: usize = 150;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Spreadsheet source configuration
    pub sheets: SheetsConfig,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().apply_env(|key| std::env::var(key).ok())
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })
    }

    /// Merge with environment variables (env takes precedence)
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.apply_env(|key| std::env::var(key).ok())
    }

    /// Override fields with every variable `lookup` knows about
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Server
        if let Some(host) = lookup("API_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            self.server.port = parse_value("API_PORT", port)?;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Sheets
        if let Some(json) = non_empty(lookup("GOOGLE_SERVICE_ACCOUNT_JSON")) {
            self.sheets.service_account_json = Some(json);
        }
        if let Some(token) = non_empty(lookup("GOOGLE_ACCESS_TOKEN")) {
            self.sheets.access_token = Some(token);
        }
        if let Some(id) = non_empty(lookup("SHEET_ID")) {
            self.sheets.default_spreadsheet_id = Some(id);
        }
        if let Some(range) = non_empty(lookup("SHEET_RANGE")) {
            self.sheets.default_range = range;
        }
        if let Some(max_rows) = lookup("SHEET_MAX_ROWS") {
            self.sheets.max_rows = parse_value("SHEET_MAX_ROWS", max_rows)?;
        }
        if let Some(url) = lookup("SHEETS_BASE_URL") {
            self.sheets.base_url = url;
        }

        // LLM
        if let Some(provider) = lookup("LLM_PROVIDER") {
            self.llm.provider = provider.parse()?;
        }
        if let Some(key) = non_empty(lookup("OPENAI_API_KEY")) {
            self.llm.openai_api_key = Some(key);
        }
        if let Some(url) = non_empty(lookup("OPENAI_BASE_URL")) {
            self.llm.openai_base_url = Some(url);
        }
        if let Some(url) = lookup("OLLAMA_URL") {
            self.llm.ollama_url = url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.llm.model = model;
        }

        // Logging
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = lookup("LOG_JSON") {
            self.logging.json_format = parse_value("LOG_JSON", json)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Reject settings the ask flow cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sheets.max_rows == 0 {
            return Err(ConfigError::InvalidValue {
                key: "SHEET_MAX_ROWS".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes
    pub max_body_size: usize,

    /// Enable CORS
    pub cors_enabled: bool,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 120,
            max_body_size: 64 * 1024, // 64KB
            cors_enabled: true,
            // Empty by default - set via CORS_ORIGINS env var
            cors_origins: vec![],
        }
    }
}

/// Spreadsheet source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Serialized service-account credentials (JSON)
    pub service_account_json: Option<String>,

    /// Pre-issued bearer token, used when no service account is set
    pub access_token: Option<String>,

    /// Spreadsheet read when the request names none
    pub default_spreadsheet_id: Option<String>,

    /// Range read when the request names none
    pub default_range: String,

    /// Sheets API base URL
    pub base_url: String,

    /// Row-window threshold (header included)
    pub max_rows: usize,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            service_account_json: None,
            access_token: None,
            default_spreadsheet_id: None,
            default_range: DEFAULT_RANGE.to_string(),
            base_url: "https://sheets.googleapis.com".to_string(),
            max_rows: DEFAULT_MAX_ROWS,
            timeout_secs: 30,
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// LLM provider to use
    pub provider: LlmProvider,

    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// OpenAI API base URL (for Azure or compatible APIs)
    pub openai_base_url: Option<String>,

    /// Ollama server URL
    pub ollama_url: String,

    /// Model name to use
    pub model: String,

    /// Maximum tokens for completion
    pub max_tokens: u32,

    /// Temperature for generation
    pub temperature: f32,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAI,
            openai_api_key: None,
            openai_base_url: None,
            ollama_url: "http://localhost:11434".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 400,
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAI,
    Ollama,
    Azure,
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            "azure" => Ok(Self::Azure),
            _ => Err(ConfigError::InvalidValue {
                key: "LLM_PROVIDER".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or a full filter directive
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

impl From<ConfigError> for crate::SheetQaError {
    fn from(err: ConfigError) -> Self {
        crate::SheetQaError::Config(err.to_string())
    }
}
