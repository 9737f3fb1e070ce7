//! Category Breakdown Report
//!
//! Groups a user's transactions by category over a stats period and ranks
//! categories by total.

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::HashMap;

use crate::error::{TallyError, TallyResult};
use crate::models::money::decimal;
use crate::models::{
    Category, CategoryId, DateRange, Money, StatsPeriod, Transaction, TransactionKind, UserId,
};
use crate::storage::{EntityStore, JoinedTransaction, TransactionQuery};

/// Which transactions a breakdown covers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BreakdownFilter {
    /// Explicit window; takes priority over `period`
    pub range: Option<DateRange>,
    /// Year or month to cover; `None` means the current month
    pub period: Option<StatsPeriod>,
    pub kind: Option<TransactionKind>,
    pub category_id: Option<CategoryId>,
    pub search: Option<String>,
}

impl BreakdownFilter {
    pub fn for_period(period: StatsPeriod) -> Self {
        Self {
            period: Some(period),
            ..Self::default()
        }
    }

    pub fn for_range(range: DateRange) -> Self {
        Self {
            range: Some(range),
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

    fn resolve_range(&self, as_of: NaiveDate) -> TallyResult<DateRange> {
        if let Some(range) = self.range {
            return Ok(range);
        }
        match self.period {
            None => Ok(DateRange::current_month(as_of)),
            Some(period) => period.range().ok_or_else(|| {
                TallyError::Validation(format!(
                    "Invalid stats period: month {} of {}",
                    period.month.unwrap_or_default(),
                    period.year
                ))
            }),
        }
    }
}

/// One category's share of the window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdownEntry {
    pub category_id: CategoryId,
    pub category_name: String,
    pub color: String,
    pub kind: TransactionKind,
    #[serde(with = "decimal")]
    pub total: Money,
    pub count: usize,
    /// Share of the total for this entry's kind, in percent
    pub percentage: f64,
}

/// Category Breakdown Report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdownReport {
    pub range: DateRange,
    /// Sorted by total descending, ties by category id
    pub entries: Vec<CategoryBreakdownEntry>,
}

impl CategoryBreakdownReport {
    /// Generate a breakdown relative to today (UTC)
    pub fn generate(
        store: &dyn EntityStore,
        user_id: UserId,
        filter: &BreakdownFilter,
    ) -> TallyResult<Self> {
        Self::generate_at(store, user_id, filter, Utc::now().date_naive())
    }

    /// Generate a breakdown, resolving "current month" against `as_of`
    pub fn generate_at(
        store: &dyn EntityStore,
        user_id: UserId,
        filter: &BreakdownFilter,
        as_of: NaiveDate,
    ) -> TallyResult<Self> {
        let range = filter.resolve_range(as_of)?;

        if let Some(category_id) = filter.category_id {
            if store.find_category(user_id, category_id)?.is_none() {
                return Err(TallyError::category_not_found(category_id.to_string()));
            }
        }

        let query = TransactionQuery {
            range,
            kind: filter.kind,
            category_id: filter.category_id,
            search: filter.search.clone(),
        };
        let rows = store.find_transactions(user_id, &query)?;

        Self::from_joined(range, &rows)
    }

    /// Group already-fetched rows
    ///
    /// Fails when a row's category could not be joined, since its name and
    /// kind are part of every entry.
    pub fn from_joined(range: DateRange, rows: &[JoinedTransaction]) -> TallyResult<Self> {
        let mut groups: HashMap<CategoryId, (&Category, Money, usize)> = HashMap::new();
        let mut kind_totals: HashMap<TransactionKind, Money> = HashMap::new();

        for row in rows {
            let txn: &Transaction = &row.transaction;
            let category = row
                .category
                .as_ref()
                .ok_or_else(|| TallyError::category_not_found(txn.category_id.to_string()))?;

            let entry = groups
                .entry(category.id)
                .or_insert((category, Money::zero(), 0));
            entry.1 += txn.amount;
            entry.2 += 1;

            *kind_totals.entry(category.kind).or_default() += txn.amount;
        }

        let mut entries: Vec<CategoryBreakdownEntry> = groups
            .into_values()
            .map(|(category, total, count)| {
                let kind_total = kind_totals
                    .get(&category.kind)
                    .copied()
                    .unwrap_or_default();
                CategoryBreakdownEntry {
                    category_id: category.id,
                    category_name: category.name.clone(),
                    color: category.color.clone(),
                    kind: category.kind,
                    total,
                    count,
                    percentage: total.percentage_of(kind_total),
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category_id.cmp(&b.category_id))
        });

        Ok(Self { range, entries })
    }

    /// Sum of every entry
    pub fn total(&self) -> Money {
        self.entries.iter().map(|e| e.total).sum()
    }

    /// Entries of one kind, keeping the ranking
    pub fn of_kind(&self, kind: TransactionKind) -> Vec<CategoryBreakdownEntry> {
        self.entries
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
