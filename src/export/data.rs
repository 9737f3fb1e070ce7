//! JSON data export
//!
//! The filtered transactions with their categories joined in, the totals
//! over them and the filters that produced them.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{TallyError, TallyResult};
use crate::models::money::decimal;
use crate::models::{CategoryId, Money, TransactionId, TransactionKind};

use super::filters::AppliedFilters;
use super::{joined_category, ExportFormat, RenderContext, ReportRenderer};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryRow<'a> {
    id: CategoryId,
    name: &'a str,
    color: &'a str,
    #[serde(rename = "type")]
    kind: TransactionKind,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRow<'a> {
    id: TransactionId,
    date: DateTime<Utc>,
    description: &'a str,
    #[serde(with = "decimal")]
    amount: Money,
    #[serde(rename = "type")]
    kind: TransactionKind,
    category: CategoryRow<'a>,
    tags: &'a [String],
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Totals {
    total_records: usize,
    #[serde(with = "decimal")]
    total_income: Money,
    #[serde(with = "decimal")]
    total_expenses: Money,
    #[serde(with = "decimal")]
    net_amount: Money,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DataDocument<'a> {
    exported_at: DateTime<Utc>,
    currency: &'a str,
    filters: &'a AppliedFilters,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<Totals>,
    transactions: Vec<TransactionRow<'a>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DataRenderer;

impl ReportRenderer for DataRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TallyResult<Vec<u8>> {
        let mut transactions = Vec::with_capacity(ctx.transactions.len());
        for row in ctx.transactions {
            ctx.cancel.check()?;
            let category = joined_category(row)?;
            let txn = &row.transaction;
            transactions.push(TransactionRow {
                id: txn.id,
                date: txn.date,
                description: &txn.description,
                amount: txn.amount,
                kind: txn.kind,
                category: CategoryRow {
                    id: category.id,
                    name: &category.name,
                    color: &category.color,
                    kind: category.kind,
                },
                tags: &txn.tags,
                created_at: txn.created_at,
            });
        }

        let summary = ctx.options.include_summary.then(|| Totals {
            total_records: ctx.summary.count,
            total_income: ctx.summary.income,
            total_expenses: ctx.summary.expenses,
            net_amount: ctx.summary.net(),
        });

        let document = DataDocument {
            exported_at: ctx.generated_at,
            currency: ctx.currency,
            filters: ctx.filters,
            summary,
            transactions,
        };

        serde_json::to_vec_pretty(&document).map_err(|e| TallyError::Render(e.to_string()))
    }
}
