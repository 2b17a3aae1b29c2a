//! Spreadsheet question handler
//!
//! Author: hephaex@gmail.com

use crate::error::AppError;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::Method, Json};
use serde::{Deserialize, Serialize};
use sheetqa_rag::AskInput;
use std::sync::Arc;
use std::time::Duration;
use utoipa::ToSchema;

/// Ask request body
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AskRequest {
    /// Question about the sheet contents
    #[schema(example = "What was total revenue in March?")]
    pub question: Option<String>,

    /// Spreadsheet to read instead of the configured default
    pub spreadsheet_id: Option<String>,

    /// A1-notation range to read instead of the configured default
    #[schema(example = "Sales!A1:D500")]
    pub range: Option<String>,
}

impl AskRequest {
    /// Parse a raw body; an empty body counts as `{}`
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        serde_json::from_slice(body)
            .map_err(|e| AppError::Validation(format!("Invalid request body: {e}")))
    }

    /// Validate and convert into the ask flow's input
    pub fn into_input(self) -> Result<AskInput, AppError> {
        let question = self
            .question
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Missing question".to_string()))?;

        Ok(AskInput {
            question,
            spreadsheet_id: self.spreadsheet_id,
            range: self.range,
        })
    }
}

/// Ask response body
#[derive(Debug, Serialize, ToSchema)]
pub struct AskResponse {
    /// Model answer, `null` when the model returned no content
    #[schema(example = "25")]
    pub answer: Option<String>,
}

/// Answer a question from the configured spreadsheet
#[utoipa::path(
    post,
    path = "/api/ask",
    tag = "ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Model answer", body = AskResponse),
        (status = 400, description = "Missing question", body = crate::error::ErrorBody),
        (status = 405, description = "Method not allowed", body = crate::error::ErrorBody),
        (status = 500, description = "Sheet or model failure, or timeout", body = crate::error::ErrorBody)
    )
)]
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    body: Bytes,
) -> Result<Json<AskResponse>, AppError> {
    if method != Method::POST {
        return Err(AppError::MethodNotAllowed);
    }

    let input = AskRequest::from_body(&body)?.into_input()?;

    // The whole fetch-and-answer flow shares one deadline
    let timeout_secs = state.config.server.request_timeout_secs;
    let result = match tokio::time::timeout(
        Duration::from_secs(timeout_secs),
        state.answerer.answer(&input),
    )
    .await
    {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => Err(AppError::Internal(format!(
            "Request timed out after {timeout_secs}s"
        ))),
    };

    match result {
        Ok(answer) => Ok(Json(AskResponse { answer })),
        Err(err) => {
            if err.status_code().is_server_error() {
                tracing::error!(error = %err, "Ask request failed");
            }
            Err(err)
        }
    }
}
