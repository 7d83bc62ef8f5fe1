//! Cache store holding the current budget state.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;

use crate::budget::{BudgetItem, BudgetSnapshot, ChartSeries, FetchError};

/// The state of the cache at a single instant.
///
/// Snapshots are shared behind an `Arc`, so cloning a state never copies
/// the dataset and a reader can never observe a partially written one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheState {
    /// No data has been fetched, or the cache was invalidated.
    #[default]
    Uninitialized,
    /// A complete snapshot is available.
    Loaded(Arc<BudgetSnapshot>),
    /// The last fetch failed. Holds no data; the next load retries.
    Failed(FetchError),
}

impl CacheState {
    /// Returns the snapshot if loaded.
    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<BudgetSnapshot>> {
        match self {
            Self::Loaded(snapshot) => Some(snapshot),
            Self::Uninitialized | Self::Failed(_) => None,
        }
    }

    /// Returns the failure if the last fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(error) => Some(error),
            Self::Uninitialized | Self::Loaded(_) => None,
        }
    }

    /// Whether a snapshot is available.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Whether the state is the uninitialized marker.
    #[must_use]
    pub fn is_uninitialized(&self) -> bool {
        matches!(self, Self::Uninitialized)
    }

    /// First item with an exactly matching title; `None` unless loaded.
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<BudgetItem> {
        self.snapshot()?.find_by_title(title).cloned()
    }

    /// Sum of all amounts; zero unless loaded.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.snapshot().map_or(Decimal::ZERO, |snapshot| snapshot.total())
    }

    /// Chart projection of the snapshot; empty unless loaded.
    #[must_use]
    pub fn chart_series(&self) -> ChartSeries {
        self.snapshot()
            .map(|snapshot| snapshot.chart_series())
            .unwrap_or_default()
    }
}

/// Holds the current [`CacheState`].
///
/// Reads are always immediate. Mutation is reserved for the coordinator,
/// which is the single writer.
#[derive(Debug, Default)]
pub struct CacheStore {
    state: RwLock<CacheState>,
}

impl CacheStore {
    /// Creates an uninitialized store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn current(&self) -> CacheState {
        self.read().clone()
    }

    /// Replaces the state with a loaded snapshot and returns the new state.
    pub(crate) fn set(&self, snapshot: Arc<BudgetSnapshot>) -> CacheState {
        let state = CacheState::Loaded(snapshot);
        *self.write() = state.clone();
        state
    }

    /// Records a failed fetch and returns the new state.
    pub(crate) fn mark_failed(&self, error: FetchError) -> CacheState {
        let state = CacheState::Failed(error);
        *self.write() = state.clone();
        state
    }

    /// Resets to `Uninitialized`.
    pub(crate) fn clear(&self) {
        *self.write() = CacheState::Uninitialized;
    }

    // The state is always replaced whole, so a poisoned lock still guards a
    // coherent value.
    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn snapshot() -> Arc<BudgetSnapshot> {
        Arc::new(BudgetSnapshot::new(vec![
            BudgetItem::new("Rent", dec!(1200)),
            BudgetItem::new("Food", dec!(400)),
        ]))
    }

    #[test]
    fn test_starts_uninitialized() {
        assert_eq!(CacheStore::new().current(), CacheState::Uninitialized);
    }

    #[test]
    fn test_set_then_clear() {
        let store = CacheStore::new();
        let state = store.set(snapshot());

        assert!(state.is_loaded());
        assert_eq!(store.current(), state);

        store.clear();
        assert!(store.current().is_uninitialized());
    }

    #[test]
    fn test_mark_failed_holds_no_data() {
        let store = CacheStore::new();
        store.mark_failed(FetchError::transport("timeout"));

        let state = store.current();
        assert_eq!(state.error(), Some(&FetchError::transport("timeout")));
        assert!(state.snapshot().is_none());
    }

    #[test]
    fn test_queries_on_loaded_state() {
        let state = CacheState::Loaded(snapshot());

        assert_eq!(state.total(), dec!(1600));
        assert_eq!(
            state.find_by_title("Food"),
            Some(BudgetItem::new("Food", dec!(400)))
        );
        assert_eq!(state.find_by_title("Utilities"), None);
        assert_eq!(state.chart_series().labels.len(), 2);
    }

    #[test]
    fn test_queries_default_when_not_loaded() {
        for state in [
            CacheState::Uninitialized,
            CacheState::Failed(FetchError::malformed("bad")),
        ] {
            assert_eq!(state.total(), Decimal::ZERO);
            assert_eq!(state.find_by_title("Rent"), None);
            assert!(state.chart_series().is_empty());
        }
    }
}
