//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Budget source server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Budget cache client configuration.
    #[serde(default)]
    pub client: ClientConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// JSON document served at `/budget`.
    #[serde(default = "default_budget_file")]
    pub budget_file: PathBuf,
    /// Directory of static files served at `/`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_budget_file() -> PathBuf {
    PathBuf::from("budget.json")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            budget_file: default_budget_file(),
            static_dir: default_static_dir(),
        }
    }
}

/// Budget cache client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Endpoint returning the budget document.
    #[serde(default = "default_budget_url")]
    pub budget_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Read the document from this file instead of over HTTP.
    #[serde(default)]
    pub budget_file: Option<PathBuf>,
}

fn default_budget_url() -> String {
    "http://localhost:3000/budget".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            budget_url: default_budget_url(),
            timeout_secs: default_timeout_secs(),
            budget_file: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `PBUDGET__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("PBUDGET").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
