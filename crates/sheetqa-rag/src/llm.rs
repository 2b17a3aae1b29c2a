//! LLM Client implementations
//!
//! Provides chat-completion clients for OpenAI-compatible APIs and Ollama.
//!
//! Author: hephaex@gmail.com

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sheetqa_core::{
    ChatMessage, ChatRequest, LlmClient, LlmConfig, LlmProvider, Result, SheetQaError,
};
use std::time::Duration;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

fn build_http_client(config: &LlmConfig) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| SheetQaError::Config(format!("Failed to build HTTP client: {e}")))
}

// ============================================================================
// OpenAI Client
// ============================================================================

/// OpenAI API client
///
/// A client without an API key can be built; it fails on every call with a
/// configuration error.
pub struct OpenAiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct Choice {
    #[serde(default)]
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: Some(api_key.into()),
            base_url: OPENAI_BASE_URL.to_string(),
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let base_url = config
            .openai_base_url
            .clone()
            .unwrap_or_else(|| OPENAI_BASE_URL.to_string());

        Ok(Self {
            client: build_http_client(config)?,
            api_key: config.openai_api_key.clone(),
            base_url,
        })
    }

    /// Set custom base URL (for Azure or compatible APIs)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SheetQaError::Config("OpenAI API key required".to_string()))?;

        let body = OpenAiRequest {
            model: &request.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetQaError::ModelInvocation(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SheetQaError::ModelInvocation(format!(
                "OpenAI error ({status}): {error_text}"
            )));
        }

        let result: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| SheetQaError::ModelInvocation(format!("Failed to parse response: {e}")))?;

        Ok(result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}

// ============================================================================
// Ollama Client
// ============================================================================

/// Ollama API client
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct OllamaResponse {
    #[serde(default)]
    message: Option<ResponseMessage>,
    #[serde(default)]
    done: bool,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Create from config
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        Ok(Self {
            client: build_http_client(config)?,
            base_url: config.ollama_url.clone(),
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>> {
        let body = OllamaRequest {
            model: &request.model,
            messages: &request.messages,
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url.trim_end_matches('/')))
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetQaError::ModelInvocation(format!("Ollama request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SheetQaError::ModelInvocation(format!(
                "Ollama error ({status}): {error_text}"
            )));
        }

        let result: OllamaResponse = response.json().await.map_err(|e| {
            SheetQaError::ModelInvocation(format!("Failed to parse Ollama response: {e}"))
        })?;

        Ok(result
            .message
            .and_then(|m| m.content)
            .filter(|content| !content.is_empty()))
    }
}

// ============================================================================
// Factory function
// ============================================================================

/// Create an LLM client from config
pub fn create_llm_client(config: &LlmConfig) -> Result<Box<dyn LlmClient>> {
    match config.provider {
        LlmProvider::OpenAI | LlmProvider::Azure => {
            Ok(Box::new(OpenAiClient::from_config(config)?))
        }
        LlmProvider::Ollama => Ok(Box::new(OllamaClient::from_config(config)?)),
    }
}

// ============================================================================
// Tests
// ============================================================================
