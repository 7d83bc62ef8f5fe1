//! Liveness route reporting the served budget document.

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
    budget_items: usize,
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: if state.budget.is_empty() { "empty" } else { "ok" },
        version: env!("CARGO_PKG_VERSION"),
        budget_items: state.budget.len(),
    })
}

/// `/health`: version and how many budget items are being served.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
