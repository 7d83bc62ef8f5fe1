//! Fetch coordination for the budget cache.
//!
//! The coordinator guarantees at most one fetch in flight. Each fetch is
//! tagged with the generation current when it started; [`BudgetCache::refresh`]
//! bumps the generation, so a fetch that completes after an invalidation is
//! recognised as superseded and dropped without touching the store or the
//! channel.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use rust_decimal::Decimal;
use tracing::{debug, info, trace, warn};

use super::broadcast::{Broadcast, Subscription};
use super::fetcher::BudgetFetcher;
use super::store::{CacheState, CacheStore};
use crate::budget::{BudgetItem, BudgetSnapshot, ChartSeries, FetchError};

type Outcome = Shared<BoxFuture<'static, CacheState>>;

/// Resolves to the cache state produced by a `load()`.
///
/// Awaiting is optional: the fetch runs on the Tokio runtime whether or not
/// the handle is polled. Handles joined to the same fetch resolve to the
/// same state. A handle whose fetch was superseded by a refresh resolves to
/// whatever the store holds when that fetch completes.
pub struct LoadHandle {
    outcome: Outcome,
}

impl LoadHandle {
    fn ready(state: CacheState) -> Self {
        Self {
            outcome: futures::future::ready(state).boxed().shared(),
        }
    }
}

impl Future for LoadHandle {
    type Output = CacheState;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.outcome.poll_unpin(cx)
    }
}

impl std::fmt::Debug for LoadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadHandle")
            .field("resolved", &self.outcome.peek().is_some())
            .finish()
    }
}

struct InFlight {
    generation: u64,
    outcome: Outcome,
}

struct Flight {
    generation: u64,
    pending: Option<InFlight>,
}

struct Inner<F> {
    fetcher: F,
    store: CacheStore,
    channel: Broadcast<CacheState>,
    flight: Mutex<Flight>,
}

impl<F: BudgetFetcher> Inner<F> {
    fn lock_flight(&self) -> MutexGuard<'_, Flight> {
        self.flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Applies a fetch result if its generation is still current.
    fn complete(&self, generation: u64, result: Result<BudgetSnapshot, FetchError>) -> CacheState {
        let mut flight = self.lock_flight();
        if flight.generation != generation {
            trace!(
                generation,
                current = flight.generation,
                "discarding superseded budget fetch"
            );
            return self.store.current();
        }
        flight.pending = None;

        let state = match result {
            Ok(snapshot) => {
                info!(generation, items = snapshot.len(), "budget snapshot loaded");
                self.store.set(Arc::new(snapshot))
            }
            Err(error) => {
                warn!(generation, %error, "budget fetch failed");
                self.store.mark_failed(error)
            }
        };
        self.channel.emit(state.clone());
        state
    }
}

/// Client-side budget cache.
///
/// Construct one at startup and share it by cloning; clones are handles to
/// the same store, channel and in-flight fetch.
pub struct BudgetCache<F> {
    inner: Arc<Inner<F>>,
}

impl<F> Clone for BudgetCache<F> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F: BudgetFetcher> BudgetCache<F> {
    /// Creates an uninitialized cache backed by `fetcher`.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                store: CacheStore::new(),
                channel: Broadcast::new(CacheState::Uninitialized),
                flight: Mutex::new(Flight {
                    generation: 1,
                    pending: None,
                }),
            }),
        }
    }

    /// Ensures data is loaded and published.
    ///
    /// If a snapshot is cached it is republished immediately with no I/O. If
    /// a fetch is already in flight the call joins it. Otherwise exactly one
    /// fetch is started under the current generation.
    ///
    /// # Panics
    ///
    /// Panics if a fetch must be started outside a Tokio runtime.
    pub fn load(&self) -> LoadHandle {
        let handle = {
            let mut flight = self.inner.lock_flight();
            self.load_locked(&mut flight)
        };
        self.inner.channel.drain();
        handle
    }

    /// Invalidates the cache and starts a fresh fetch.
    ///
    /// Any fetch still in flight becomes stale. The invalidation and the new
    /// fetch happen under one lock, so no concurrent `load()` can observe the
    /// cleared store without also joining the new fetch. When this returns
    /// the store reports `Uninitialized` until that fetch completes.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn refresh(&self) -> LoadHandle {
        let handle = {
            let mut flight = self.inner.lock_flight();
            flight.generation += 1;
            flight.pending = None;
            self.inner.store.clear();
            self.inner.channel.emit(CacheState::Uninitialized);
            info!(generation = flight.generation, "budget cache invalidated");
            self.load_locked(&mut flight)
        };
        self.inner.channel.drain();
        handle
    }

    /// Cache hit, join or start, with the flight lock already held.
    ///
    /// Emissions are queued; the caller drains after releasing the lock.
    fn load_locked(&self, flight: &mut Flight) -> LoadHandle {
        let state = self.inner.store.current();

        if state.is_loaded() {
            debug!("budget cache hit");
            self.inner.channel.emit(state.clone());
            LoadHandle::ready(state)
        } else if let Some(pending) = &flight.pending {
            debug!(generation = pending.generation, "joining in-flight budget fetch");
            LoadHandle {
                outcome: pending.outcome.clone(),
            }
        } else {
            let generation = flight.generation;
            let outcome = self.spawn_fetch(generation);
            flight.pending = Some(InFlight {
                generation,
                outcome: outcome.clone(),
            });
            LoadHandle { outcome }
        }
    }

    /// Returns the current state without waiting.
    #[must_use]
    pub fn current(&self) -> CacheState {
        self.inner.store.current()
    }

    /// Subscribes to state changes, replaying the latest published state.
    pub fn subscribe<H>(&self, handler: H) -> Subscription
    where
        H: Fn(&CacheState) + Send + Sync + 'static,
    {
        self.inner.channel.subscribe(handler)
    }

    /// The generation new fetches are tagged with.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.lock_flight().generation
    }

    /// Whether a snapshot is currently loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current().is_loaded()
    }

    /// First item titled exactly `title` in the current snapshot.
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<BudgetItem> {
        self.current().find_by_title(title)
    }

    /// Sum of all amounts in the current snapshot, zero when not loaded.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.current().total()
    }

    /// Chart projection of the current snapshot.
    #[must_use]
    pub fn chart_series(&self) -> ChartSeries {
        self.current().chart_series()
    }

    fn spawn_fetch(&self, generation: u64) -> Outcome {
        info!(generation, "starting budget fetch");

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            // Build the fetch future inside the guard too: a fetcher may
            // panic before returning it.
            let result = AssertUnwindSafe(async { inner.fetcher.fetch().await })
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(FetchError::transport("budget fetcher panicked")));
            let state = inner.complete(generation, result);
            inner.channel.drain();
            state
        });

        let inner = Arc::clone(&self.inner);
        async move {
            match task.await {
                Ok(state) => state,
                Err(err) => {
                    warn!(generation, %err, "budget fetch task did not complete");
                    let state = inner.complete(
                        generation,
                        Err(FetchError::transport(format!(
                            "budget fetch task did not complete: {err}"
                        ))),
                    );
                    inner.channel.drain();
                    state
                }
            }
        }
        .boxed()
        .shared()
    }
}

impl<F> std::fmt::Debug for BudgetCache<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BudgetCache")
            .field("state", &self.inner.store.current())
            .finish_non_exhaustive()
    }
}
