//! Read-only queries over a budget snapshot.

use rust_decimal::Decimal;

use super::types::{BudgetItem, BudgetSnapshot, ChartSeries};

impl BudgetSnapshot {
    /// Returns the first item whose title matches exactly (case-sensitive).
    #[must_use]
    pub fn find_by_title(&self, title: &str) -> Option<&BudgetItem> {
        self.items().iter().find(|item| item.title == title)
    }

    /// Sum of every item amount.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items().iter().map(|item| item.amount).sum()
    }

    /// Projects the snapshot into chart labels and values.
    #[must_use]
    pub fn chart_series(&self) -> ChartSeries {
        let (labels, values) = self
            .items()
            .iter()
            .map(|item| (item.title.clone(), item.amount))
            .unzip();
        ChartSeries { labels, values }
    }
}
