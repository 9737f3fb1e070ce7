//! Storage layer for Tallybook
//!
//! The statistics and export engine only reads. It talks to persistence
//! through the [`EntityStore`] trait; [`Storage`] is the JSON-file
//! implementation, which also enforces the write-side invariants
//! (ownership, uniqueness, field limits) when records are added.

pub mod budgets;
pub mod categories;
pub mod file_io;
pub mod query;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use query::{CategoryTotal, JoinedTransaction, TransactionQuery};
pub use transactions::TransactionRepository;

use std::collections::{BTreeMap, HashMap};
use std::sync::PoisonError;

use crate::config::paths::TallyPaths;
use crate::error::{TallyError, TallyResult};
use crate::models::{
    Budget, Category, CategoryId, DateRange, Money, Transaction, TransactionKind, UserId,
};

pub(crate) fn lock_error<T>(err: PoisonError<T>) -> TallyError {
    TallyError::store(format!("Failed to acquire lock: {}", err))
}

/// Read-only contract the engine consumes
///
/// Implementations own their concurrency control. Every method is scoped to
/// one user; records of other users are never returned.
pub trait EntityStore {
    /// Matching transactions, newest first, with categories joined
    fn find_transactions(
        &self,
        user_id: UserId,
        query: &TransactionQuery,
    ) -> TallyResult<Vec<JoinedTransaction>>;

    /// Budgets for a year, optionally one month
    fn find_budgets(&self, user_id: UserId, year: i32, month: Option<u32>)
        -> TallyResult<Vec<Budget>>;

    /// Expense totals grouped by category within `range`, ordered by category id
    fn sum_expenses_by_category(
        &self,
        user_id: UserId,
        range: &DateRange,
    ) -> TallyResult<Vec<CategoryTotal>>;

    /// A user's categories, optionally of one kind
    fn find_categories(
        &self,
        user_id: UserId,
        kind: Option<TransactionKind>,
    ) -> TallyResult<Vec<Category>>;

    /// One category, `None` unless it exists and belongs to `user_id`
    fn find_category(&self, user_id: UserId, id: CategoryId) -> TallyResult<Option<Category>> {
        Ok(self
            .find_categories(user_id, None)?
            .into_iter()
            .find(|c| c.id == id))
    }
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: TallyPaths,
    pub transactions: TransactionRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: TallyPaths) -> Result<Self, TallyError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &TallyPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), TallyError> {
        self.categories.load()?;
        self.transactions.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), TallyError> {
        self.categories.save()?;
        self.transactions.save()?;
        self.budgets.save()?;
        Ok(())
    }

    /// Add a category after validating it
    pub fn add_category(&self, category: Category) -> TallyResult<Category> {
        category
            .validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;
        self.categories.upsert(category.clone())?;
        Ok(category)
    }

    /// Add a transaction after validating it and its category reference
    pub fn add_transaction(&self, txn: Transaction) -> TallyResult<Transaction> {
        txn.validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;
        self.require_owned_category(txn.user_id, txn.category_id)?;
        self.transactions.upsert(txn.clone())?;
        Ok(txn)
    }

    /// Add a budget after validating it and its category reference
    pub fn add_budget(&self, budget: Budget) -> TallyResult<Budget> {
        budget
            .validate()
            .map_err(|e| TallyError::Validation(e.to_string()))?;
        self.require_owned_category(budget.user_id, budget.category_id)?;
        self.budgets.upsert(budget.clone())?;
        Ok(budget)
    }

    fn require_owned_category(&self, user_id: UserId, id: CategoryId) -> TallyResult<Category> {
        self.categories
            .get(id)?
            .filter(|c| c.user_id == user_id)
            .ok_or_else(|| TallyError::category_not_found(id.to_string()))
    }
}

impl EntityStore for Storage {
    fn find_transactions(
        &self,
        user_id: UserId,
        query: &TransactionQuery,
    ) -> TallyResult<Vec<JoinedTransaction>> {
        let categories: HashMap<CategoryId, Category> = self
            .categories
            .for_user(user_id, None)?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        Ok(self
            .transactions
            .for_user(user_id)?
            .into_iter()
            .filter(|txn| query.matches(txn))
            .map(|transaction| JoinedTransaction {
                category: categories.get(&transaction.category_id).cloned(),
                transaction,
            })
            .collect())
    }

    fn find_budgets(
        &self,
        user_id: UserId,
        year: i32,
        month: Option<u32>,
    ) -> TallyResult<Vec<Budget>> {
        self.budgets.for_period(user_id, year, month)
    }

    fn sum_expenses_by_category(
        &self,
        user_id: UserId,
        range: &DateRange,
    ) -> TallyResult<Vec<CategoryTotal>> {
        let mut totals: BTreeMap<CategoryId, (Money, usize)> = BTreeMap::new();
        for txn in self.transactions.for_user(user_id)? {
            if txn.is_expense() && range.contains(&txn.date) {
                let entry = totals.entry(txn.category_id).or_insert((Money::zero(), 0));
                entry.0 += txn.amount;
                entry.1 += 1;
            }
        }

        Ok(totals
            .into_iter()
            .map(|(category_id, (total, count))| CategoryTotal {
                category_id,
                total,
                count,
            })
            .collect())
    }

    fn find_categories(
        &self,
        user_id: UserId,
        kind: Option<TransactionKind>,
    ) -> TallyResult<Vec<Category>> {
        self.categories.for_user(user_id, kind)
    }

    fn find_category(&self, user_id: UserId, id: CategoryId) -> TallyResult<Option<Category>> {
        Ok(self.categories.get(id)?.filter(|c| c.user_id == user_id))
    }
}
