//! The fetch collaborator seam.

use std::future::Future;

use crate::budget::{BudgetSnapshot, FetchError};

/// Source of budget snapshots.
///
/// Implementations must resolve exactly once per call. The cache treats the
/// transport as opaque: HTTP, a local file or an in-memory fake all qualify.
pub trait BudgetFetcher: Send + Sync + 'static {
    /// Fetches one complete snapshot.
    fn fetch(&self) -> impl Future<Output = Result<BudgetSnapshot, FetchError>> + Send;
}
