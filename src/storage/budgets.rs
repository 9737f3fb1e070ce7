//! Budget repository for JSON storage
//!
//! Manages loading and saving budgets to budgets.json. At most one budget
//! exists per (user, category, year, month).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::TallyError;
use crate::models::{Budget, BudgetId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    budgets: Vec<Budget>,
}

/// Repository for budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

fn period_order(a: &Budget, b: &Budget) -> std::cmp::Ordering {
    (a.year, a.month, a.category_id).cmp(&(b.year, b.month, b.category_id))
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(HashMap::new()),
        }
    }

    /// Load budgets from disk
    pub fn load(&self) -> Result<(), TallyError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = self.budgets.write().map_err(lock_error)?;
        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert(budget.id, budget);
        }

        Ok(())
    }

    /// Save budgets to disk
    pub fn save(&self) -> Result<(), TallyError> {
        let budgets = self.budgets.read().map_err(lock_error)?;

        let mut list: Vec<_> = budgets.values().cloned().collect();
        list.sort_by(|a, b| a.user_id.cmp(&b.user_id).then(period_order(a, b)));

        write_json_atomic(&self.path, &BudgetData { budgets: list })
    }

    pub fn get(&self, id: BudgetId) -> Result<Option<Budget>, TallyError> {
        let budgets = self.budgets.read().map_err(lock_error)?;
        Ok(budgets.get(&id).cloned())
    }

    /// A user's budgets for a year, optionally narrowed to one month
    pub fn for_period(
        &self,
        user_id: UserId,
        year: i32,
        month: Option<u32>,
    ) -> Result<Vec<Budget>, TallyError> {
        let budgets = self.budgets.read().map_err(lock_error)?;

        let mut list: Vec<_> = budgets
            .values()
            .filter(|b| {
                b.user_id == user_id && b.year == year && month.map_or(true, |m| b.month == m)
            })
            .cloned()
            .collect();
        list.sort_by(period_order);
        Ok(list)
    }

    /// Insert or update a budget
    ///
    /// Fails with `Duplicate` when the user already has a different budget
    /// for the same category and month.
    pub fn upsert(&self, budget: Budget) -> Result<(), TallyError> {
        let mut budgets = self.budgets.write().map_err(lock_error)?;

        let clash = budgets.values().any(|existing| {
            existing.id != budget.id
                && existing.user_id == budget.user_id
                && existing.category_id == budget.category_id
                && existing.year == budget.year
                && existing.month == budget.month
        });
        if clash {
            return Err(TallyError::Duplicate {
                entity_type: "Budget",
                identifier: format!(
                    "{} for {:04}-{:02}",
                    budget.category_id, budget.year, budget.month
                ),
            });
        }

        budgets.insert(budget.id, budget);
        Ok(())
    }

    pub fn delete(&self, id: BudgetId) -> Result<bool, TallyError> {
        let mut budgets = self.budgets.write().map_err(lock_error)?;
        Ok(budgets.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Money};
    use tempfile::TempDir;

    #[test]
    fn test_one_budget_per_category_month() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        let user = UserId::new();
        let category = CategoryId::new();

        let mut january = Budget::new(user, category, Money::from_units(100), 2024, 1);
        repo.upsert(january.clone()).unwrap();

        let err = repo
            .upsert(Budget::new(user, category, Money::from_units(80), 2024, 1))
            .unwrap_err();
        assert!(err.is_duplicate());

        // Updating the same record is not a clash
        january.amount = Money::from_units(120);
        repo.upsert(january).unwrap();
        repo.upsert(Budget::new(user, category, Money::from_units(80), 2024, 2))
            .unwrap();
    }

    #[test]
    fn test_for_period() {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        let user = UserId::new();

        for month in [3, 1, 2] {
            repo.upsert(Budget::new(user, CategoryId::new(), Money::from_units(10), 2024, month))
                .unwrap();
        }
        repo.upsert(Budget::new(user, CategoryId::new(), Money::from_units(10), 2023, 1))
            .unwrap();

        let year: Vec<_> = repo
            .for_period(user, 2024, None)
            .unwrap()
            .iter()
            .map(|b| b.month)
            .collect();
        assert_eq!(year, vec![1, 2, 3]);
        assert_eq!(repo.for_period(user, 2024, Some(2)).unwrap().len(), 1);
        assert!(repo.for_period(UserId::new(), 2024, None).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("budgets.json");
        let budget = Budget::new(UserId::new(), CategoryId::new(), Money::from_units(250), 2025, 6);

        let repo = BudgetRepository::new(path.clone());
        repo.upsert(budget.clone()).unwrap();
        repo.save().unwrap();

        let reloaded = BudgetRepository::new(path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.get(budget.id).unwrap(), Some(budget.clone()));
        assert!(reloaded.delete(budget.id).unwrap());
    }
}
