//! pbudget server
//!
//! Serves the budget document consumed by the budget cache, plus the
//! static front-end bundle.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pbudget_api::{AppState, create_router, load_budget_document};
use pbudget_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pbudget=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    // The document is read once; edits need a restart
    let budget = load_budget_document(&config.server.budget_file).await?;

    let state = AppState {
        budget: Arc::new(budget),
    };
    let app = create_router(state, &config.server.static_dir);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(
        static_dir = %config.server.static_dir.display(),
        "Server listening on {}", addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
