//! Core budget cache logic for pbudget.
//!
//! This crate contains the client-side cache with ZERO web dependencies.
//! The transport that actually fetches the dataset is plugged in through
//! the [`cache::BudgetFetcher`] trait.
//!
//! # Modules
//!
//! - `budget` - Budget data model and read-only queries
//! - `cache` - Single-flight cache store, coordinator and replay-latest broadcast

pub mod budget;
pub mod cache;

pub use budget::{BudgetItem, BudgetSnapshot, ChartSeries, FetchError};
pub use cache::{BudgetCache, BudgetFetcher, CacheState, LoadHandle, Subscription};
