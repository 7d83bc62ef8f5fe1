//! Filesystem transport.

use std::future::Future;
use std::path::{Path, PathBuf};

use pbudget_core::{BudgetFetcher, BudgetSnapshot, FetchError};
use tracing::debug;

/// Reads the persisted budget document from disk.
#[derive(Debug, Clone)]
pub struct FileBudgetFetcher {
    path: PathBuf,
}

impl FileBudgetFetcher {
    /// Creates a fetcher reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this fetcher reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BudgetFetcher for FileBudgetFetcher {
    fn fetch(&self) -> impl Future<Output = Result<BudgetSnapshot, FetchError>> + Send {
        async move {
            debug!(path = %self.path.display(), "reading budget document");

            let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
                FetchError::transport(format!("{}: {e}", self.path.display()))
            })?;

            BudgetSnapshot::from_json(&bytes)
        }
    }
}
