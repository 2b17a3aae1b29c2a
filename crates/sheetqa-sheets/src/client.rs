//! Google Sheets `values.get` client

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use sheetqa_core::{
    Cell, IdentityProvider, Result, RowTable, SheetQaError, SheetReference, TabularSource,
};
use std::sync::Arc;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Reads cell ranges from the Sheets v4 API
pub struct GoogleSheetsClient {
    client: Client,
    base_url: String,
    identity: Arc<dyn IdentityProvider>,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Option<Vec<Vec<Value>>>,
}

impl GoogleSheetsClient {
    /// Create a client against the public Sheets endpoint
    pub fn new(client: Client, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            identity,
        }
    }

    /// Set custom base URL (for emulators or proxies)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}` with each segment encoded
    fn values_url(&self, sheet: &SheetReference) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            SheetQaError::Config(format!("Invalid Sheets base URL {}: {e}", self.base_url))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                SheetQaError::Config(format!("Sheets base URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                sheet.spreadsheet_id.as_str(),
                "values",
                sheet.range.as_str(),
            ]);

        Ok(url)
    }
}

/// Strings pass through, null becomes an absent cell, anything else is
/// rendered with its JSON text.
fn cell_from_value(value: Value) -> Cell {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl TabularSource for GoogleSheetsClient {
    async fn fetch_rows(&self, sheet: &SheetReference) -> Result<RowTable> {
        if sheet.spreadsheet_id.trim().is_empty() {
            return Err(SheetQaError::UpstreamFetch(
                "No spreadsheet id provided or configured".to_string(),
            ));
        }

        let url = self.values_url(sheet)?;
        let token = self.identity.access_token().await?;

        tracing::debug!(
            spreadsheet_id = %sheet.spreadsheet_id,
            range = %sheet.range,
            "Fetching sheet values"
        );

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SheetQaError::UpstreamFetch(format!("Sheets request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SheetQaError::UpstreamFetch(format!(
                "Sheets API error ({status}): {error_text}"
            )));
        }

        let range: ValueRange = response.json().await.map_err(|e| {
            SheetQaError::UpstreamFetch(format!("Failed to parse Sheets response: {e}"))
        })?;

        let rows = range
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_from_value).collect())
            .collect();

        Ok(RowTable::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticTokenIdentity;
    use serde_json::json;

    fn client(base_url: &str) -> GoogleSheetsClient {
        GoogleSheetsClient::new(Client::new(), Arc::new(StaticTokenIdentity::new("t")))
            .with_base_url(base_url)
    }

    #[test]
    fn test_values_url_encodes_segments() {
        let url = client("https://sheets.example.test")
            .values_url(&SheetReference::new("abc123", "My Sheet!A1:D500"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.example.test/v4/spreadsheets/abc123/values/My%20Sheet!A1:D500"
        );
    }

    #[test]
    fn test_values_url_keeps_base_path() {
        let url = client("http://127.0.0.1:9000/proxy/")
            .values_url(&SheetReference::new("id", "Sales!A1:B2"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:9000/proxy/v4/spreadsheets/id/values/Sales!A1:B2"
        );
    }

    #[test]
    fn test_values_url_rejects_garbage_base() {
        let err = client("not a url")
            .values_url(&SheetReference::new("id", "A1"))
            .unwrap_err();
        assert!(matches!(err, SheetQaError::Config(_)));
    }

    #[test]
    fn test_cell_from_value() {
        assert_eq!(cell_from_value(json!("x")), Some("x".to_string()));
        assert_eq!(cell_from_value(Value::Null), None);
        assert_eq!(cell_from_value(json!(12.5)), Some("12.5".to_string()));
        assert_eq!(cell_from_value(json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_missing_values_field_is_empty() {
        let range: ValueRange =
            serde_json::from_value(json!({ "range": "Sales!A1:D500", "majorDimension": "ROWS" }))
                .unwrap();
        assert!(range.values.is_none());
    }

    #[tokio::test]
    async fn test_blank_spreadsheet_id_is_rejected() {
        let err = client("http://127.0.0.1:1")
            .fetch_rows(&SheetReference::new("", "A1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SheetQaError::UpstreamFetch(_)));
    }
}
