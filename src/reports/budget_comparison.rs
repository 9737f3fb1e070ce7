//! Budget Comparison Report
//!
//! Joins a month's budgets against actual expense totals per category.

use chrono::{Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{TallyError, TallyResult};
use crate::models::money::decimal;
use crate::models::{Budget, CategoryId, DateRange, Money, UserId};
use crate::storage::EntityStore;

/// Budget versus actual spending for one category-month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparison {
    pub budget: Budget,
    /// Joined category name, when the category still resolves
    pub category_name: Option<String>,
    #[serde(with = "decimal")]
    pub actual_spending: Money,
    /// `budget.amount - actual_spending`; negative once overspent
    #[serde(with = "decimal")]
    pub remaining: Money,
    pub overspent: bool,
}

impl BudgetComparison {
    pub fn new(budget: Budget, category_name: Option<String>, actual_spending: Money) -> Self {
        Self {
            remaining: budget.amount - actual_spending,
            overspent: actual_spending > budget.amount,
            category_name,
            actual_spending,
            budget,
        }
    }

    /// Spending as a percentage of the budget, 0 for a zero budget
    pub fn percent_used(&self) -> f64 {
        self.actual_spending.percentage_of(self.budget.amount)
    }
}

/// Budget Comparison Report for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetComparisonReport {
    pub year: i32,
    pub month: u32,
    pub comparisons: Vec<BudgetComparison>,
}

impl BudgetComparisonReport {
    /// Comparisons for the current UTC month
    pub fn generate_current(store: &dyn EntityStore, user_id: UserId) -> TallyResult<Self> {
        Self::generate_current_at(store, user_id, Utc::now().date_naive())
    }

    /// Comparisons for the month containing `as_of`
    pub fn generate_current_at(
        store: &dyn EntityStore,
        user_id: UserId,
        as_of: NaiveDate,
    ) -> TallyResult<Self> {
        Self::generate(store, user_id, as_of.year(), as_of.month())
    }

    /// Comparisons for every budget the user set for `year`/`month`
    pub fn generate(
        store: &dyn EntityStore,
        user_id: UserId,
        year: i32,
        month: u32,
    ) -> TallyResult<Self> {
        let window = DateRange::month(year, month).ok_or_else(|| {
            TallyError::Validation(format!("Invalid budget month: {}-{}", year, month))
        })?;

        let budgets = store.find_budgets(user_id, year, Some(month))?;
        if budgets.is_empty() {
            return Ok(Self {
                year,
                month,
                comparisons: Vec::new(),
            });
        }

        let actuals: HashMap<CategoryId, Money> = store
            .sum_expenses_by_category(user_id, &window)?
            .into_iter()
            .map(|t| (t.category_id, t.total))
            .collect();
        let names: HashMap<CategoryId, String> = store
            .find_categories(user_id, None)?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();

        let comparisons = budgets
            .into_iter()
            .map(|budget| {
                let actual = actuals
                    .get(&budget.category_id)
                    .copied()
                    .unwrap_or_default();
                let name = names.get(&budget.category_id).cloned();
                BudgetComparison::new(budget, name, actual)
            })
            .collect();

        Ok(Self {
            year,
            month,
            comparisons,
        })
    }

    pub fn total_budgeted(&self) -> Money {
        self.comparisons.iter().map(|c| c.budget.amount).sum()
    }

    pub fn total_spent(&self) -> Money {
        self.comparisons.iter().map(|c| c.actual_spending).sum()
    }

    pub fn overspent(&self) -> impl Iterator<Item = &BudgetComparison> {
        self.comparisons.iter().filter(|c| c.overspent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;
    use crate::testing::{at, day, Fixture};

    #[test]
    fn test_overspent_budget() {
        let fx = Fixture::new();
        fx.budget(fx.food.id, 100, 2024, 1);
        fx.expense(fx.food.id, 90, at(2024, 1, 8), "Groceries");
        fx.expense(fx.food.id, 60, at(2024, 1, 22), "Dinner out");

        let report = BudgetComparisonReport::generate(&fx.storage, fx.user, 2024, 1).unwrap();
        assert_eq!(report.comparisons.len(), 1);

        let food = &report.comparisons[0];
        assert_eq!(food.actual_spending, Money::from_units(150));
        assert_eq!(food.remaining, Money::from_units(-50));
        assert!(food.overspent);
        assert_eq!(food.category_name.as_deref(), Some("Food"));
        assert_eq!(report.overspent().count(), 1);
    }

    #[test]
    fn test_exactly_on_budget_is_not_overspent() {
        let fx = Fixture::new();
        fx.budget(fx.food.id, 100, 2024, 1);
        fx.expense(fx.food.id, 100, at(2024, 1, 8), "Groceries");

        let report = BudgetComparisonReport::generate(&fx.storage, fx.user, 2024, 1).unwrap();
        let food = &report.comparisons[0];
        assert_eq!(food.remaining, Money::zero());
        assert!(!food.overspent);
        assert_eq!(food.percent_used(), 100.0);
    }

    #[test]
    fn test_untouched_budget_and_identity() {
        let fx = Fixture::new();
        let travel = fx.category("Travel", TransactionKind::Expense);
        fx.budget(fx.food.id, 120, 2024, 2);
        fx.budget(travel.id, 300, 2024, 2);
        fx.expense(fx.food.id, 45, at(2024, 2, 14), "Valentine dinner");
        // Outside the month and income do not count
        fx.expense(travel.id, 80, at(2024, 3, 1), "Train");
        fx.income(fx.salary.id, 1000, at(2024, 2, 1), "Pay");

        let report = BudgetComparisonReport::generate(&fx.storage, fx.user, 2024, 2).unwrap();
        let travel_row = report
            .comparisons
            .iter()
            .find(|c| c.budget.category_id == travel.id)
            .unwrap();
        assert_eq!(travel_row.actual_spending, Money::zero());
        assert_eq!(travel_row.remaining, Money::from_units(300));
        assert!(!travel_row.overspent);

        for c in &report.comparisons {
            assert_eq!(c.remaining + c.actual_spending, c.budget.amount);
        }
        assert_eq!(report.total_budgeted(), Money::from_units(420));
        assert_eq!(report.total_spent(), Money::from_units(45));
    }

    #[test]
    fn test_current_month_and_empty() {
        let fx = Fixture::new();
        fx.budget(fx.food.id, 50, 2024, 5);

        let may = BudgetComparisonReport::generate_current_at(&fx.storage, fx.user, day(2024, 5, 9))
            .unwrap();
        assert_eq!((may.year, may.month), (2024, 5));
        assert_eq!(may.comparisons.len(), 1);

        let june = BudgetComparisonReport::generate(&fx.storage, fx.user, 2024, 6).unwrap();
        assert!(june.comparisons.is_empty());
    }

    #[test]
    fn test_invalid_month() {
        let fx = Fixture::new();
        let err = BudgetComparisonReport::generate(&fx.storage, fx.user, 2024, 0).unwrap_err();
        assert!(err.is_validation());
    }
}
