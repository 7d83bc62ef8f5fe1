//! Budget data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::FetchError;

/// A single budget line: a title and the amount allotted to it.
///
/// On the wire the amount travels as `budget`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetItem {
    /// Display title, assumed unique within a snapshot.
    pub title: String,
    /// Allotted amount. Any sign or magnitude is accepted.
    #[serde(rename = "budget")]
    pub amount: Decimal,
}

impl BudgetItem {
    /// Creates a new budget item.
    #[must_use]
    pub fn new(title: impl Into<String>, amount: Decimal) -> Self {
        Self {
            title: title.into(),
            amount,
        }
    }
}

/// One complete, immutable version of the budget dataset.
///
/// Serializes as the persisted document `{"myBudget": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    #[serde(rename = "myBudget")]
    items: Vec<BudgetItem>,
}

impl BudgetSnapshot {
    /// Creates a snapshot from items in display order.
    #[must_use]
    pub fn new(items: Vec<BudgetItem>) -> Self {
        Self { items }
    }

    /// Parses a snapshot from the persisted JSON document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, FetchError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Items in snapshot order.
    #[must_use]
    pub fn items(&self) -> &[BudgetItem] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the snapshot holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<BudgetItem>> for BudgetSnapshot {
    fn from(items: Vec<BudgetItem>) -> Self {
        Self::new(items)
    }
}

/// Parallel label/value series for pie-style charts, in snapshot order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    /// Item titles.
    pub labels: Vec<String>,
    /// Item amounts, index-aligned with `labels`.
    pub values: Vec<Decimal>,
}

impl ChartSeries {
    /// Whether the series holds no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
