//! Query and result shapes exchanged with the entity store

use serde::Serialize;

use crate::models::{Category, CategoryId, DateRange, Money, Transaction, TransactionKind};

/// Filter applied to a user's transactions
///
/// Every field narrows the result; the default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionQuery {
    pub range: DateRange,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<CategoryId>,
    /// Case-insensitive substring of the description
    pub search: Option<String>,
}

impl TransactionQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn in_range(range: DateRange) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.range.contains(&txn.date)
            && self.kind.map_or(true, |kind| txn.kind == kind)
            && self.category_id.map_or(true, |id| txn.category_id == id)
            && self
                .search
                .as_deref()
                .map_or(true, |needle| txn.description_matches(needle))
    }
}

/// A transaction with its category joined in
///
/// `category` is `None` when the reference cannot be resolved for the owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedTransaction {
    pub transaction: Transaction,
    pub category: Option<Category>,
}

/// Grouped expense sum for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub total: Money,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn txn(kind: TransactionKind, description: &str) -> Transaction {
        Transaction::new(
            UserId::new(),
            CategoryId::new(),
            kind,
            Money::from_units(10),
            Utc.with_ymd_and_hms(2024, 1, 10, 9, 30, 0).unwrap(),
            description,
        )
    }

    #[test]
    fn test_default_matches_everything() {
        assert!(TransactionQuery::all().matches(&txn(TransactionKind::Income, "Salary")));
    }

    #[test]
    fn test_filters_narrow() {
        let expense = txn(TransactionKind::Expense, "Weekly Groceries");

        assert!(TransactionQuery::all()
            .with_kind(TransactionKind::Expense)
            .with_search("groceries")
            .matches(&expense));
        assert!(!TransactionQuery::all()
            .with_kind(TransactionKind::Income)
            .matches(&expense));
        assert!(!TransactionQuery::all()
            .with_category(CategoryId::new())
            .matches(&expense));

        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        assert!(!TransactionQuery::in_range(DateRange::days(feb, feb)).matches(&expense));
    }
}
