//! Shared errors and configuration for pbudget.
//!
//! This crate provides what both the server and the cache consumers need:
//! - Application-wide error types
//! - Layered configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, ClientConfig, ServerConfig};
pub use error::{AppError, AppResult};
