//! Shared fixtures for unit tests

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use crate::config::paths::TallyPaths;
use crate::models::{Budget, Category, CategoryId, Money, Transaction, TransactionKind, UserId};
use crate::storage::Storage;

/// Noon UTC on the given day
pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A temp-dir backed store with one user and a Food/Salary category pair
pub struct Fixture {
    _temp_dir: TempDir,
    pub storage: Storage,
    pub user: UserId,
    pub food: Category,
    pub salary: Category,
}

impl Fixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let paths = TallyPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();

        let user = UserId::new();
        let food = storage
            .add_category(Category::new(user, "Food", TransactionKind::Expense).with_color("#EF4444"))
            .unwrap();
        let salary = storage
            .add_category(
                Category::new(user, "Salary", TransactionKind::Income).with_color("#10B981"),
            )
            .unwrap();

        Self {
            _temp_dir: temp_dir,
            storage,
            user,
            food,
            salary,
        }
    }

    /// Groceries (expense, 50) on 2024-01-05 and Salary (income, 2000) on 2024-01-20
    pub fn with_january() -> Self {
        let fx = Self::new();
        fx.expense(fx.food.id, 50, at(2024, 1, 5), "Groceries");
        fx.income(fx.salary.id, 2000, at(2024, 1, 20), "Salary");
        fx
    }

    pub fn category(&self, name: &str, kind: TransactionKind) -> Category {
        self.storage
            .add_category(Category::new(self.user, name, kind))
            .unwrap()
    }

    pub fn expense(
        &self,
        category_id: CategoryId,
        units: i64,
        date: DateTime<Utc>,
        description: &str,
    ) -> Transaction {
        self.add(TransactionKind::Expense, category_id, Money::from_units(units), date, description)
    }

    pub fn income(
        &self,
        category_id: CategoryId,
        units: i64,
        date: DateTime<Utc>,
        description: &str,
    ) -> Transaction {
        self.add(TransactionKind::Income, category_id, Money::from_units(units), date, description)
    }

    pub fn add(
        &self,
        kind: TransactionKind,
        category_id: CategoryId,
        amount: Money,
        date: DateTime<Utc>,
        description: &str,
    ) -> Transaction {
        let txn = Transaction::new(self.user, category_id, kind, amount, date, description);
        self.storage.add_transaction(txn).unwrap()
    }

    pub fn budget(&self, category_id: CategoryId, units: i64, year: i32, month: u32) -> Budget {
        self.storage
            .add_budget(Budget::new(
                self.user,
                category_id,
                Money::from_units(units),
                year,
                month,
            ))
            .unwrap()
    }
}
