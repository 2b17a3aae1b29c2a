//! SheetQA API Server
//!
//! Answers questions about spreadsheet data through a language model.
//!
//! Author: hephaex@gmail.com

use clap::Parser;
use sheetqa_api::{create_router, state::AppState};
use sheetqa_core::config::{AppConfig, LlmProvider, LoggingConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sheetqa-api", version, about = "Spreadsheet question answering API")]
struct Args {
    /// TOML config file; environment variables override its values
    #[arg(short, long, env = "SHEETQA_CONFIG")]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &logging.level;
        format!("sheetqa_api={level},sheetqa_rag={level},sheetqa_sheets={level},tower_http=info")
            .into()
    });

    if logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    // Initialize tracing
    init_tracing(&config.logging);

    if config.sheets.service_account_json.is_none() && config.sheets.access_token.is_none() {
        tracing::warn!("No Google credentials configured; ask requests will fail");
    }
    if config.sheets.default_spreadsheet_id.is_none() {
        tracing::warn!("SHEET_ID not set; requests must supply spreadsheetId");
    }
    if config.llm.openai_api_key.is_none() && config.llm.provider != LlmProvider::Ollama {
        tracing::warn!("OPENAI_API_KEY not set; model calls will fail");
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);

    // Create application state
    let state = Arc::new(AppState::from_config(config)?);

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("SheetQA API Server starting on http://{}", addr);
    tracing::info!("OpenAPI document at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
