//! Budget document endpoints.

use axum::{Json, Router, extract::State, routing::get};
use serde_json::Value;
use tracing::debug;

use crate::AppState;

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budget", get(get_budget))
        .route("/hello", get(hello))
}

/// Returns the budget document as stored.
async fn get_budget(State(state): State<AppState>) -> Json<Value> {
    debug!(items = state.budget.len(), "serving budget document");
    Json(state.budget.raw().clone())
}

/// Greeting used as a liveness smoke test.
async fn hello() -> &'static str {
    "Hello World!"
}
