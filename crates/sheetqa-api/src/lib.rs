//! SheetQA API - HTTP server
//!
//! Provides the spreadsheet question endpoint plus health and metrics.
//!
//! Author: hephaex@gmail.com

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use sheetqa_core::ServerConfig;
use state::AppState;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

/// OpenAPI document for the public endpoints
#[derive(OpenApi)]
#[openapi(
    paths(handlers::ask::ask_handler, handlers::health::health_check),
    components(schemas(
        handlers::ask::AskRequest,
        handlers::ask::AskResponse,
        handlers::health::HealthResponse,
        error::ErrorBody
    )),
    tags(
        (name = "ask", description = "Spreadsheet question answering"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let server = state.config.server.clone();

    let router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::health::metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", routes::api_routes())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::track_requests,
        ))
        .layer(DefaultBodyLimit::max(server.max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if server.cors_enabled {
        router.layer(cors_layer(&server))
    } else {
        router
    }
}

/// Router wired to caller-supplied collaborators, for integration tests
#[cfg(feature = "test-utils")]
pub fn create_router_for_testing(
    config: sheetqa_core::AppConfig,
    source: Arc<dyn sheetqa_core::TabularSource>,
    llm: Arc<dyn sheetqa_core::LlmClient>,
) -> Router {
    create_router(Arc::new(AppState::new(config, source, llm)))
}
