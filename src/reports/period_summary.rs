//! Period Summary Report
//!
//! Income, expenses and savings over one window. The statistics view uses it
//! for the current calendar month; exports use it for the filtered set.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::error::TallyResult;
use crate::models::money::decimal;
use crate::models::{DateRange, Money, Transaction, TransactionKind, UserId};
use crate::storage::{EntityStore, TransactionQuery};

/// Totals for a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodSummaryReport {
    pub range: DateRange,
    #[serde(with = "decimal")]
    pub income: Money,
    #[serde(with = "decimal")]
    pub expenses: Money,
    pub income_count: usize,
    pub expense_count: usize,
    /// Number of transactions that contributed
    pub count: usize,
}

impl PeriodSummaryReport {
    /// Summary of the current UTC calendar month
    pub fn generate(store: &dyn EntityStore, user_id: UserId) -> TallyResult<Self> {
        Self::generate_at(store, user_id, Utc::now().date_naive())
    }

    /// Summary of the calendar month containing `as_of`
    pub fn generate_at(
        store: &dyn EntityStore,
        user_id: UserId,
        as_of: NaiveDate,
    ) -> TallyResult<Self> {
        let range = DateRange::current_month(as_of);
        let rows = store.find_transactions(user_id, &TransactionQuery::in_range(range))?;
        Ok(Self::from_transactions(
            range,
            rows.iter().map(|row| &row.transaction),
        ))
    }

    /// Sum an already-filtered set of transactions
    pub fn from_transactions<'a>(
        range: DateRange,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Self {
        let mut summary = Self {
            range,
            income: Money::zero(),
            expenses: Money::zero(),
            income_count: 0,
            expense_count: 0,
            count: 0,
        };

        for txn in transactions {
            match txn.kind {
                TransactionKind::Income => {
                    summary.income += txn.amount;
                    summary.income_count += 1;
                }
                TransactionKind::Expense => {
                    summary.expenses += txn.amount;
                    summary.expense_count += 1;
                }
            }
            summary.count += 1;
        }

        summary
    }

    /// Income minus expenses; negative when more went out than came in
    pub fn savings(&self) -> Money {
        self.income - self.expenses
    }

    /// Alias used by export documents
    pub fn net(&self) -> Money {
        self.savings()
    }

    /// Savings as a percentage of income, 0 without income
    pub fn savings_rate(&self) -> f64 {
        self.savings().percentage_of(self.income)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, day, Fixture};

    #[test]
    fn test_january_scenario() {
        let fx = Fixture::with_january();

        let summary =
            PeriodSummaryReport::generate_at(&fx.storage, fx.user, day(2024, 1, 31)).unwrap();
        assert_eq!(summary.income, Money::from_units(2000));
        assert_eq!(summary.expenses, Money::from_units(50));
        assert_eq!(summary.savings(), Money::from_units(1950));
        assert_eq!(summary.count, 2);
        assert_eq!((summary.income_count, summary.expense_count), (1, 1));
        assert_eq!(summary.range.start_date(), Some(day(2024, 1, 1)));
        assert_eq!(summary.range.end_date(), Some(day(2024, 1, 31)));
    }

    #[test]
    fn test_savings_can_be_negative() {
        let fx = Fixture::new();
        fx.expense(fx.food.id, 300, at(2024, 2, 3), "Party");
        fx.income(fx.salary.id, 100, at(2024, 2, 10), "Refund");

        let summary =
            PeriodSummaryReport::generate_at(&fx.storage, fx.user, day(2024, 2, 15)).unwrap();
        assert_eq!(summary.savings(), Money::from_units(-200));
        assert!(summary.savings_rate() < 0.0);
    }

    #[test]
    fn test_other_months_excluded() {
        let fx = Fixture::with_january();
        fx.expense(fx.food.id, 75, at(2024, 2, 1), "February");

        let summary =
            PeriodSummaryReport::generate_at(&fx.storage, fx.user, day(2024, 2, 29)).unwrap();
        assert_eq!(summary.income, Money::zero());
        assert_eq!(summary.expenses, Money::from_units(75));
        assert_eq!(summary.count, 1);
    }

    #[test]
    fn test_zero_amount_counts_but_adds_nothing() {
        let fx = Fixture::new();
        fx.add(
            TransactionKind::Expense,
            fx.food.id,
            Money::zero(),
            at(2024, 3, 2),
            "Free sample",
        );

        let summary =
            PeriodSummaryReport::generate_at(&fx.storage, fx.user, day(2024, 3, 2)).unwrap();
        assert_eq!(summary.expenses, Money::zero());
        assert_eq!(summary.count, 1);
        assert_eq!(summary.savings_rate(), 0.0);
    }
}
