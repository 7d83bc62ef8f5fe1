//! Property-based tests for budget queries.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{BudgetItem, BudgetSnapshot};

/// Strategy to generate amounts with cents, negative included.
fn amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a snapshot of 0-20 items drawn from a small title pool.
fn snapshot() -> impl Strategy<Value = BudgetSnapshot> {
    prop::collection::vec(("[A-E]", amount()), 0..20).prop_map(|pairs| {
        BudgetSnapshot::new(
            pairs
                .into_iter()
                .map(|(title, amount)| BudgetItem::new(title, amount))
                .collect(),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// The total equals the sum of item amounts, independent of order.
    #[test]
    fn prop_total_is_order_independent(snapshot in snapshot()) {
        let mut reversed = snapshot.items().to_vec();
        reversed.reverse();
        let reversed = BudgetSnapshot::new(reversed);

        prop_assert_eq!(snapshot.total(), reversed.total());
    }

    /// Lookup returns the first item carrying the title, or nothing.
    #[test]
    fn prop_find_returns_first_match(snapshot in snapshot(), title in "[A-F]") {
        let expected = snapshot.items().iter().position(|item| item.title == title);
        let found = snapshot.find_by_title(&title);

        match expected {
            Some(index) => prop_assert_eq!(found, Some(&snapshot.items()[index])),
            None => prop_assert!(found.is_none()),
        }
    }

    /// Chart series stays index-aligned with the snapshot.
    #[test]
    fn prop_chart_series_aligned(snapshot in snapshot()) {
        let series = snapshot.chart_series();

        prop_assert_eq!(series.labels.len(), snapshot.len());
        prop_assert_eq!(series.values.iter().copied().sum::<Decimal>(), snapshot.total());
    }
}
