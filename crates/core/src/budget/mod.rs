//! Budget data model and derived queries.

pub mod error;
pub mod query;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::FetchError;
pub use types::{BudgetItem, BudgetSnapshot, ChartSeries};
