//! HTTP budget source server.
//!
//! This crate provides:
//! - The `/budget` endpoint consumed by the budget cache
//! - Greeting and health routes
//! - Static file serving for the front-end bundle

pub mod document;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use document::{BudgetDocument, load_budget_document};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Budget document read once at startup.
    pub budget: Arc<BudgetDocument>,
}

/// Creates the main application router.
///
/// Paths without a route fall through to static files under `static_dir`.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
