//! SheetQA Sheets - spreadsheet access
//!
//! Provides the Google Sheets implementation of [`TabularSource`] and the
//! identity providers it authenticates with.

pub mod client;
pub mod identity;

pub use client::GoogleSheetsClient;
pub use identity::{
    sign_assertion, ServiceAccountIdentity, ServiceAccountKey, StaticTokenIdentity,
    SHEETS_READONLY_SCOPE,
};

use reqwest::Client;
use sheetqa_core::{IdentityProvider, Result, SheetQaError, SheetsConfig, TabularSource};
use std::sync::Arc;
use std::time::Duration;

/// Pick an identity provider from config.
///
/// A service account takes precedence over a static token. With neither
/// configured, the service-account identity is still returned so that the
/// missing credentials are reported on the request that needs them.
pub fn create_identity(config: &SheetsConfig, client: Client) -> Arc<dyn IdentityProvider> {
    match (&config.service_account_json, &config.access_token) {
        (Some(json), _) => Arc::new(ServiceAccountIdentity::new(client, json.clone())),
        (None, Some(token)) => Arc::new(StaticTokenIdentity::new(token.clone())),
        (None, None) => Arc::new(ServiceAccountIdentity::new(client, String::new())),
    }
}

/// Create a Sheets tabular source from config
pub fn create_tabular_source(config: &SheetsConfig) -> Result<Arc<dyn TabularSource>> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| SheetQaError::Config(format!("Failed to build HTTP client: {e}")))?;

    let identity = create_identity(config, client.clone());
    let source = GoogleSheetsClient::new(client, identity).with_base_url(&config.base_url);

    Ok(Arc::new(source))
}
