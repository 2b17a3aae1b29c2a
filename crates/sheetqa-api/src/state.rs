//! Application state management
//!
//! Author: hephaex@gmail.com

use sheetqa_core::{AppConfig, LlmClient, Result, TabularSource};
use sheetqa_rag::{create_llm_client, AnswerConfig, SheetQuestionAnswerer};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Ask flow with its collaborators
    pub answerer: SheetQuestionAnswerer,
}

impl AppState {
    /// Create state around explicitly constructed collaborators
    pub fn new(
        config: AppConfig,
        source: Arc<dyn TabularSource>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        let answerer =
            SheetQuestionAnswerer::new(source, llm, AnswerConfig::from_app_config(&config));

        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            answerer,
        }
    }

    /// Build the Sheets source and LLM client described by `config`
    pub fn from_config(config: AppConfig) -> Result<Self> {
        let source = sheetqa_sheets::create_tabular_source(&config.sheets)?;
        let llm: Arc<dyn LlmClient> = Arc::from(create_llm_client(&config.llm)?);

        Ok(Self::new(config, source, llm))
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
