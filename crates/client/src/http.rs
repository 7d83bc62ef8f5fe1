//! HTTP transport using reqwest.

use std::future::Future;
use std::time::Duration;

use pbudget_core::{BudgetFetcher, BudgetSnapshot, FetchError};
use pbudget_shared::ClientConfig;
use tracing::debug;

/// Fetches the budget document with a GET request.
///
/// Connection failures, timeouts and non-success statuses are transport
/// errors; a body that does not parse is a malformed payload.
#[derive(Debug, Clone)]
pub struct HttpBudgetFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpBudgetFetcher {
    /// Creates a fetcher for `url` with the given request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::transport(e.to_string()))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Creates a fetcher from client configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        Self::new(&config.budget_url, Duration::from_secs(config.timeout_secs))
    }

    /// The endpoint this fetcher targets.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl BudgetFetcher for HttpBudgetFetcher {
    fn fetch(&self) -> impl Future<Output = Result<BudgetSnapshot, FetchError>> + Send {
        async move {
            debug!(url = %self.url, "requesting budget document");

            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .and_then(reqwest::Response::error_for_status)
                .map_err(|e| FetchError::transport(e.to_string()))?;

            let body = response
                .bytes()
                .await
                .map_err(|e| FetchError::transport(e.to_string()))?;

            BudgetSnapshot::from_json(&body)
        }
    }
}
