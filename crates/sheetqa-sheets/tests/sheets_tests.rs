//! Sheets client integration tests
//!
//! A local axum server stands in for both the OAuth token endpoint and the
//! Sheets `values.get` endpoint.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::{json, Value};
use sheetqa_core::{SheetQaError, SheetReference, TabularSource};
use sheetqa_sheets::{GoogleSheetsClient, ServiceAccountIdentity, StaticTokenIdentity};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const PRIVATE_KEY: &str = include_str!("fixtures/service_account_key.pem");

#[derive(Default)]
struct Recorded {
    token_forms: Vec<HashMap<String, String>>,
    value_requests: Vec<(String, Option<String>)>,
}

#[derive(Clone)]
struct MockState {
    recorded: Arc<Mutex<Recorded>>,
    values: Value,
    values_status: StatusCode,
}

async fn token_handler(
    State(state): State<MockState>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    state.recorded.lock().unwrap().token_forms.push(form);
    Json(json!({ "access_token": "ya29.mock", "expires_in": 3599, "token_type": "Bearer" }))
}

async fn values_handler(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);
    state
        .recorded
        .lock()
        .unwrap()
        .value_requests
        .push((uri.path().to_string(), auth));
    (state.values_status, Json(state.values.clone()))
}

/// Spawn the mock server and return its base URL
async fn spawn_mock(values: Value, values_status: StatusCode) -> (String, Arc<Mutex<Recorded>>) {
    let recorded = Arc::new(Mutex::new(Recorded::default()));
    let state = MockState {
        recorded: recorded.clone(),
        values,
        values_status,
    };

    let app = Router::new()
        .route("/token", post(token_handler))
        .route("/v4/spreadsheets/*rest", get(values_handler))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), recorded)
}

fn service_account_json(token_uri: &str) -> String {
    json!({
        "type": "service_account",
        "project_id": "demo",
        "private_key_id": "key-1",
        "private_key": PRIVATE_KEY,
        "client_email": "reader@demo.iam.gserviceaccount.com",
        "token_uri": token_uri,
    })
    .to_string()
}

#[tokio::test]
async fn test_fetch_rows_with_service_account() {
    let (base, recorded) = spawn_mock(
        json!({
            "range": "Sales!A1:D500",
            "majorDimension": "ROWS",
            "values": [["Date", "Amount"], ["2024-03-01", "10"], ["2024-03-02"]]
        }),
        StatusCode::OK,
    )
    .await;

    let http = reqwest::Client::new();
    let identity =
        ServiceAccountIdentity::new(http.clone(), service_account_json(&format!("{base}/token")));
    let source = GoogleSheetsClient::new(http, Arc::new(identity)).with_base_url(&base);

    let table = source
        .fetch_rows(&SheetReference::new("sheet-1", "Sales!A1:D500"))
        .await
        .unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.rows()[2], vec![Some("2024-03-02".to_string())]);

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.token_forms.len(), 1);
    let form = &recorded.token_forms[0];
    assert_eq!(
        form.get("grant_type").map(String::as_str),
        Some("urn:ietf:params:oauth:grant-type:jwt-bearer")
    );
    assert_eq!(form["assertion"].split('.').count(), 3);

    assert_eq!(recorded.value_requests.len(), 1);
    let (path, auth) = &recorded.value_requests[0];
    assert_eq!(path, "/v4/spreadsheets/sheet-1/values/Sales!A1:D500");
    assert_eq!(auth.as_deref(), Some("Bearer ya29.mock"));
}

#[tokio::test]
async fn test_missing_values_is_empty_table() {
    let (base, _) = spawn_mock(json!({ "range": "Sales!A1:D500" }), StatusCode::OK).await;

    let source = GoogleSheetsClient::new(
        reqwest::Client::new(),
        Arc::new(StaticTokenIdentity::new("ya29.static")),
    )
    .with_base_url(&base);

    let table = source
        .fetch_rows(&SheetReference::new("sheet-1", "Sales!A1:D500"))
        .await
        .unwrap();
    assert!(table.is_empty());
}

#[tokio::test]
async fn test_api_error_is_upstream_fetch() {
    let (base, _) = spawn_mock(
        json!({ "error": { "code": 403, "message": "The caller does not have permission" } }),
        StatusCode::FORBIDDEN,
    )
    .await;

    let source = GoogleSheetsClient::new(
        reqwest::Client::new(),
        Arc::new(StaticTokenIdentity::new("ya29.static")),
    )
    .with_base_url(&base);

    let err = source
        .fetch_rows(&SheetReference::new("sheet-1", "Sales!A1:D500"))
        .await
        .unwrap_err();

    match err {
        SheetQaError::UpstreamFetch(msg) => {
            assert!(msg.contains("403"));
            assert!(msg.contains("does not have permission"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_credentials_skip_the_sheet_call() {
    let (base, recorded) = spawn_mock(json!({ "values": [] }), StatusCode::OK).await;

    let http = reqwest::Client::new();
    let identity = ServiceAccountIdentity::new(http.clone(), "{\"client_email\": ");
    let source = GoogleSheetsClient::new(http, Arc::new(identity)).with_base_url(&base);

    let err = source
        .fetch_rows(&SheetReference::new("sheet-1", "Sales!A1:D500"))
        .await
        .unwrap_err();

    assert!(matches!(err, SheetQaError::UpstreamFetch(_)));
    let recorded = recorded.lock().unwrap();
    assert!(recorded.token_forms.is_empty());
    assert!(recorded.value_requests.is_empty());
}
