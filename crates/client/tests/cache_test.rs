//! End-to-end cache behaviour over real transports.

use std::sync::{Arc, Mutex};

use pbudget_client::{BudgetSource, FileBudgetFetcher, HttpBudgetFetcher};
use pbudget_core::{BudgetCache, CacheState, FetchError};
use pbudget_shared::ClientConfig;
use rust_decimal_macros::dec;

const RENT_AND_FOOD: &str =
    r#"{"myBudget": [{"title": "Rent", "budget": 1200}, {"title": "Food", "budget": 400}]}"#;

#[tokio::test]
async fn test_file_cache_hit_until_refresh() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.json");
    std::fs::write(&path, RENT_AND_FOOD).unwrap();
    let cache = BudgetCache::new(FileBudgetFetcher::new(&path));

    assert_eq!(cache.load().await.total(), dec!(1600));

    std::fs::write(&path, r#"{"myBudget": [{"title": "Rent", "budget": 1300}]}"#).unwrap();
    assert_eq!(
        cache.load().await.total(),
        dec!(1600),
        "a loaded cache must not re-read the source"
    );

    assert_eq!(cache.refresh().await.total(), dec!(1300));
    assert_eq!(cache.find_by_title("Food"), None);
}

#[tokio::test]
async fn test_file_failure_then_retry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("budget.json");
    let cache = BudgetCache::new(FileBudgetFetcher::new(&path));

    let state = cache.load().await;
    assert!(matches!(state.error(), Some(FetchError::Transport(_))));
    assert_eq!(cache.total(), dec!(0));

    std::fs::write(&path, RENT_AND_FOOD).unwrap();
    assert!(cache.load().await.is_loaded());
    assert_eq!(cache.find_by_title("Food").unwrap().amount, dec!(400));
}

#[tokio::test]
async fn test_http_source_from_config() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = axum::Router::new().route(
        "/budget",
        axum::routing::get(|| async { RENT_AND_FOOD }),
    );
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let config = ClientConfig {
        budget_url: format!("http://{addr}/budget"),
        ..ClientConfig::default()
    };
    let cache = BudgetCache::new(BudgetSource::from_config(&config).unwrap());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let _sub = cache.subscribe(move |state: &CacheState| sink.lock().unwrap().push(state.clone()));

    let state = cache.load().await;

    assert_eq!(state.total(), dec!(1600));
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].is_uninitialized());
    assert!(seen[1].is_loaded());
}

#[tokio::test]
async fn test_http_source_unreachable_fails() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let fetcher = HttpBudgetFetcher::new(
        format!("http://{addr}/budget"),
        std::time::Duration::from_secs(2),
    )
    .unwrap();
    let cache = BudgetCache::new(fetcher);

    let state = cache.load().await;

    assert!(matches!(state, CacheState::Failed(FetchError::Transport(_))));
    assert!(!cache.is_loaded());
}
