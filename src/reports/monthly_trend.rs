//! Monthly Trend Report
//!
//! Income and expense totals per UTC calendar month, most recent first.

use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::TallyResult;
use crate::models::money::decimal;
use crate::models::{Money, Transaction, TransactionKind, UserId};
use crate::storage::{EntityStore, TransactionQuery};

/// Number of months kept by the statistics view
pub const TREND_MONTHS: usize = 12;

/// Totals for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub year: i32,
    pub month: u32,
    #[serde(with = "decimal")]
    pub income: Money,
    #[serde(with = "decimal")]
    pub expenses: Money,
}

impl MonthlyTotals {
    pub fn savings(&self) -> Money {
        self.income - self.expenses
    }

    /// "2024-01"
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Monthly Trend Report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyTrendReport {
    /// Descending by (year, month)
    pub months: Vec<MonthlyTotals>,
}

impl MonthlyTrendReport {
    /// The most recent twelve months that have any transactions
    ///
    /// Covers the user's whole history; no date filter applies.
    pub fn generate(store: &dyn EntityStore, user_id: UserId) -> TallyResult<Self> {
        let rows = store.find_transactions(user_id, &TransactionQuery::all())?;
        Ok(Self::from_transactions(
            rows.iter().map(|row| &row.transaction),
            Some(TREND_MONTHS),
        ))
    }

    /// Group transactions by month, keeping at most `limit` recent months
    pub fn from_transactions<'a>(
        transactions: impl IntoIterator<Item = &'a Transaction>,
        limit: Option<usize>,
    ) -> Self {
        let mut grouped: BTreeMap<(i32, u32), (Money, Money)> = BTreeMap::new();

        for txn in transactions {
            let key = (txn.date.year(), txn.date.month());
            let entry = grouped.entry(key).or_default();
            match txn.kind {
                TransactionKind::Income => entry.0 += txn.amount,
                TransactionKind::Expense => entry.1 += txn.amount,
            }
        }

        let months = grouped
            .into_iter()
            .rev()
            .take(limit.unwrap_or(usize::MAX))
            .map(|((year, month), (income, expenses))| MonthlyTotals {
                year,
                month,
                income,
                expenses,
            })
            .collect();

        Self { months }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, Fixture};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_groups_and_sorts_descending() {
        let fx = Fixture::with_january();
        fx.expense(fx.food.id, 10, at(2023, 12, 24), "Christmas dinner");
        fx.income(fx.salary.id, 500, at(2024, 3, 1), "Bonus");

        let report = MonthlyTrendReport::generate(&fx.storage, fx.user).unwrap();
        let labels: Vec<_> = report.months.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["2024-03", "2024-01", "2023-12"]);

        let january = report.months[1];
        assert_eq!(january.income, Money::from_units(2000));
        assert_eq!(january.expenses, Money::from_units(50));
        assert_eq!(january.savings(), Money::from_units(1950));
        assert_eq!(report.months[0].expenses, Money::zero());
    }

    #[test]
    fn test_capped_at_twelve_months() {
        let fx = Fixture::new();
        for offset in 0..15u32 {
            let (year, month) = (2023 + (offset / 12) as i32, offset % 12 + 1);
            fx.expense(fx.food.id, 1, at(year, month, 10), "Monthly");
        }

        let report = MonthlyTrendReport::generate(&fx.storage, fx.user).unwrap();
        assert_eq!(report.months.len(), TREND_MONTHS);
        assert_eq!(report.months[0].label(), "2024-03");
        assert_eq!(report.months[11].label(), "2023-04");
        assert!(report
            .months
            .windows(2)
            .all(|w| (w[0].year, w[0].month) > (w[1].year, w[1].month)));
    }

    #[test]
    fn test_month_boundaries_are_utc() {
        let fx = Fixture::new();
        let last_instant = Utc.with_ymd_and_hms(2024, 1, 31, 23, 59, 59).unwrap();
        let first_instant = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        fx.expense(fx.food.id, 1, last_instant, "Late");
        fx.expense(fx.food.id, 2, first_instant, "Early");

        let report = MonthlyTrendReport::generate(&fx.storage, fx.user).unwrap();
        assert_eq!(report.months.len(), 2);
        assert_eq!(report.months[0].expenses, Money::from_units(2));
        assert_eq!(report.months[1].expenses, Money::from_units(1));
    }

    #[test]
    fn test_empty_history() {
        let fx = Fixture::new();
        assert!(MonthlyTrendReport::generate(&fx.storage, fx.user)
            .unwrap()
            .is_empty());
    }
}
