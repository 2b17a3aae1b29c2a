//! API route definitions
//!
//! Author: hephaex@gmail.com

use crate::handlers::ask;
use crate::state::AppState;
use axum::{routing::any, Router};
use std::sync::Arc;

/// Create `/api` routes
///
/// The ask route accepts every method so that non-POST requests get the
/// JSON 405 body from the handler.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/ask", any(ask::ask_handler))
}
