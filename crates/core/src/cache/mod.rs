//! Client-side budget cache.
//!
//! A [`BudgetCache`] fetches the dataset at most once per generation, keeps
//! it in a [`CacheStore`], and hands every state change to subscribers via a
//! replay-latest [`Broadcast`] channel.

pub mod broadcast;
pub mod coordinator;
pub mod fetcher;
pub mod store;


pub use broadcast::{Broadcast, Subscription};
pub use coordinator::{BudgetCache, LoadHandle};
pub use fetcher::BudgetFetcher;
pub use store::{CacheState, CacheStore};
