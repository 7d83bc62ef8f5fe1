//! pbudget viewer
//!
//! Loads the budget through the cache and prints each item with the total.
//!
//! Usage: cargo run --bin pbudget-viewer
//!
//! Set `PBUDGET_VIEWER_REFRESH=1` to invalidate and reload once more.

use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pbudget_client::BudgetSource;
use pbudget_core::{BudgetCache, BudgetFetcher, CacheState};
use pbudget_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pbudget=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;
    let source = BudgetSource::from_config(&config.client)?;
    info!(source = %source.describe(), "Budget viewer starting");

    let cache = BudgetCache::new(source);
    let _subscription = cache.subscribe(|state| match state {
        CacheState::Uninitialized => debug!("budget pending"),
        CacheState::Loaded(snapshot) => {
            info!(items = snapshot.len(), total = %snapshot.total(), "budget available");
        }
        CacheState::Failed(error) => {
            warn!(%error, code = error.error_code(), "budget unavailable");
        }
    });

    if let CacheState::Failed(error) = cache.load().await {
        return Err(error.into());
    }
    print_summary(&cache);

    // Served from the cache, no second request
    cache.load().await;

    if std::env::var_os("PBUDGET_VIEWER_REFRESH").is_some() {
        if let CacheState::Failed(error) = cache.refresh().await {
            return Err(error.into());
        }
        println!();
        print_summary(&cache);
    }

    Ok(())
}

fn print_summary<F: BudgetFetcher>(cache: &BudgetCache<F>) {
    let series = cache.chart_series();
    for (label, value) in series.labels.iter().zip(&series.values) {
        println!("{label:<24} {value:>12}");
    }
    println!("{:<24} {:>12}", "Total", cache.total());
}
