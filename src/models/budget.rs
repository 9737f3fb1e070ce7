//! Budget model
//!
//! A budget is a spending ceiling for one category in one calendar month.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{BudgetId, CategoryId, UserId};
use super::money::Money;
use super::range::DateRange;

/// Earliest budget year accepted by the store
pub const MIN_BUDGET_YEAR: i32 = 2020;
/// Latest budget year accepted by the store
pub const MAX_BUDGET_YEAR: i32 = 2030;

/// A monthly budget for a category
///
/// `(user_id, category_id, year, month)` is unique in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub user_id: UserId,
    pub category_id: CategoryId,

    /// Non-negative ceiling
    pub amount: Money,

    /// 1-12
    pub month: u32,

    pub year: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// Create a new budget
    pub fn new(
        user_id: UserId,
        category_id: CategoryId,
        amount: Money,
        year: i32,
        month: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            user_id,
            category_id,
            amount,
            month,
            year,
            created_at: now,
            updated_at: now,
        }
    }

    /// The calendar-month window this budget covers
    pub fn window(&self) -> Option<DateRange> {
        DateRange::month(self.year, self.month)
    }

    /// Validate the budget
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.amount.is_negative() {
            return Err(BudgetValidationError::NegativeAmount);
        }

        if !(1..=12).contains(&self.month) {
            return Err(BudgetValidationError::InvalidMonth(self.month));
        }

        if !(MIN_BUDGET_YEAR..=MAX_BUDGET_YEAR).contains(&self.year) {
            return Err(BudgetValidationError::InvalidYear(self.year));
        }

        Ok(())
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02} budget: {}", self.year, self.month, self.amount)
    }
}

/// Validation errors for budgets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BudgetValidationError {
    NegativeAmount,
    InvalidMonth(u32),
    InvalidYear(i32),
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Budget amount cannot be negative"),
            Self::InvalidMonth(m) => write!(f, "Budget month must be 1-12, got {}", m),
            Self::InvalidYear(y) => write!(
                f,
                "Budget year must be {}-{}, got {}",
                MIN_BUDGET_YEAR, MAX_BUDGET_YEAR, y
            ),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_validation() {
        let mut budget = Budget::new(UserId::new(), CategoryId::new(), Money::from_units(100), 2024, 1);
        assert!(budget.validate().is_ok());

        budget.month = 13;
        assert_eq!(budget.validate(), Err(BudgetValidationError::InvalidMonth(13)));

        budget.month = 12;
        budget.year = 2031;
        assert_eq!(budget.validate(), Err(BudgetValidationError::InvalidYear(2031)));

        budget.year = 2024;
        budget.amount = Money::from_cents(-1);
        assert_eq!(budget.validate(), Err(BudgetValidationError::NegativeAmount));
    }

    #[test]
    fn test_budget_window() {
        let budget = Budget::new(UserId::new(), CategoryId::new(), Money::zero(), 2024, 2);
        let window = budget.window().unwrap();
        assert_eq!(window.start_date().unwrap().to_string(), "2024-02-01");
        assert_eq!(window.end_date().unwrap().to_string(), "2024-02-29");
    }

    #[test]
    fn test_display() {
        let budget = Budget::new(UserId::new(), CategoryId::new(), Money::from_units(100), 2024, 1);
        assert_eq!(budget.to_string(), "2024-01 budget: $100.00");
    }
}
