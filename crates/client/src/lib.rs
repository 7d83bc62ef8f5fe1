//! Budget fetch transports for the pbudget cache.
//!
//! Each transport implements [`BudgetFetcher`] and resolves to a complete
//! [`pbudget_core::BudgetSnapshot`]:
//! - [`HttpBudgetFetcher`] - GET against the budget endpoint
//! - [`FileBudgetFetcher`] - reads the persisted JSON document
//! - [`BudgetSource`] - picks one of the above from [`ClientConfig`]

pub mod file;
pub mod http;

use std::future::Future;

use pbudget_core::{BudgetFetcher, BudgetSnapshot, FetchError};
use pbudget_shared::ClientConfig;

pub use file::FileBudgetFetcher;
pub use http::HttpBudgetFetcher;

/// The transport selected by configuration.
#[derive(Debug, Clone)]
pub enum BudgetSource {
    /// Fetch over HTTP.
    Http(HttpBudgetFetcher),
    /// Read from the local filesystem.
    File(FileBudgetFetcher),
}

impl BudgetSource {
    /// Builds the transport described by `config`.
    ///
    /// A configured `budget_file` takes precedence over `budget_url`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        match &config.budget_file {
            Some(path) => Ok(Self::File(FileBudgetFetcher::new(path))),
            None => Ok(Self::Http(HttpBudgetFetcher::from_config(config)?)),
        }
    }

    /// Human-readable description of where data comes from.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Http(fetcher) => fetcher.url().to_string(),
            Self::File(fetcher) => fetcher.path().display().to_string(),
        }
    }
}

impl BudgetFetcher for BudgetSource {
    fn fetch(&self) -> impl Future<Output = Result<BudgetSnapshot, FetchError>> + Send {
        async move {
            match self {
                Self::Http(fetcher) => fetcher.fetch().await,
                Self::File(fetcher) => fetcher.fetch().await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_file_takes_precedence() {
        let config = ClientConfig {
            budget_file: Some(PathBuf::from("budget.json")),
            ..ClientConfig::default()
        };

        let source = BudgetSource::from_config(&config).unwrap();

        assert!(matches!(source, BudgetSource::File(_)));
        assert_eq!(source.describe(), "budget.json");
    }

    #[test]
    fn test_http_by_default() {
        let source = BudgetSource::from_config(&ClientConfig::default()).unwrap();

        assert!(matches!(source, BudgetSource::Http(_)));
        assert_eq!(source.describe(), "http://localhost:3000/budget");
    }
}
