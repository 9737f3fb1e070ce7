//! Financial report
//!
//! Aggregated figures for a named, calendar-aligned period: totals and
//! savings rate, income and expense breakdowns by category, the monthly
//! series inside the window and budget comparisons for each month the window
//! touches.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{TallyError, TallyResult};
use crate::models::money::decimal;
use crate::models::{DateRange, Money, ReportPeriod, TransactionKind, UserId};
use crate::reports::{
    BudgetComparisonReport, CategoryBreakdownEntry, CategoryBreakdownReport, MonthlyTotals,
    MonthlyTrendReport, PeriodSummaryReport,
};
use crate::storage::{EntityStore, TransactionQuery};

use super::cancel::CancelToken;
use super::theme::ThemeName;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    #[serde(with = "decimal")]
    pub total_income: Money,
    #[serde(with = "decimal")]
    pub total_expenses: Money,
    #[serde(with = "decimal")]
    pub net_amount: Money,
    /// Percent of income kept, two decimals
    pub savings_rate: f64,
    pub transaction_count: usize,
}

impl From<&PeriodSummaryReport> for FinancialSummary {
    fn from(summary: &PeriodSummaryReport) -> Self {
        Self {
            total_income: summary.income,
            total_expenses: summary.expenses,
            net_amount: summary.net(),
            savings_rate: (summary.savings_rate() * 100.0).round() / 100.0,
            transaction_count: summary.count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub period: ReportPeriod,
    pub range: DateRange,
    pub theme: ThemeName,
    pub generated_at: DateTime<Utc>,
    pub currency: String,
    pub summary: FinancialSummary,
    pub income_categories: Vec<CategoryBreakdownEntry>,
    pub expense_categories: Vec<CategoryBreakdownEntry>,
    /// Months inside the window, most recent first
    pub monthly: Vec<MonthlyTotals>,
    /// Only months that have budgets
    pub budgets: Vec<BudgetComparisonReport>,
}

/// What to build a financial report for
#[derive(Debug, Clone)]
pub struct FinancialRequest<'a> {
    pub user_id: UserId,
    pub period: ReportPeriod,
    pub first_day_of_week: u8,
    pub theme: ThemeName,
    pub currency: &'a str,
    pub now: DateTime<Utc>,
}

impl FinancialReport {
    /// Aggregate the period containing `request.now`
    pub fn generate(
        store: &dyn EntityStore,
        request: &FinancialRequest<'_>,
        cancel: &CancelToken,
    ) -> TallyResult<Self> {
        let range = request
            .period
            .range(request.now.date_naive(), request.first_day_of_week);

        cancel.check()?;
        let rows = store.find_transactions(request.user_id, &TransactionQuery::in_range(range))?;
        cancel.check()?;

        let summary = PeriodSummaryReport::from_transactions(range, rows.iter().map(|r| &r.transaction));
        let breakdown = CategoryBreakdownReport::from_joined(range, &rows)
            .map_err(|e| TallyError::Render(e.to_string()))?;
        let monthly = MonthlyTrendReport::from_transactions(rows.iter().map(|r| &r.transaction), None);

        let mut budgets = Vec::new();
        for (year, month) in range.months() {
            cancel.check()?;
            let report = BudgetComparisonReport::generate(store, request.user_id, year, month)?;
            if !report.comparisons.is_empty() {
                budgets.push(report);
            }
        }

        Ok(Self {
            period: request.period,
            range,
            theme: request.theme,
            generated_at: request.now,
            currency: request.currency.to_string(),
            summary: FinancialSummary::from(&summary),
            income_categories: breakdown.of_kind(TransactionKind::Income),
            expense_categories: breakdown.of_kind(TransactionKind::Expense),
            monthly: monthly.months,
            budgets,
        })
    }

    pub fn transaction_count(&self) -> usize {
        self.summary.transaction_count
    }

    pub fn to_json(&self) -> TallyResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| TallyError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, Fixture};
    use chrono::TimeZone;

    fn request(fx: &Fixture, period: ReportPeriod, now: DateTime<Utc>) -> FinancialRequest<'static> {
        FinancialRequest {
            user_id: fx.user,
            period,
            first_day_of_week: 0,
            theme: ThemeName::Default,
            currency: "$",
            now,
        }
    }

    #[test]
    fn test_month_report_contents() {
        let fx = Fixture::with_january();
        fx.budget(fx.food.id, 40, 2024, 1);
        fx.expense(fx.food.id, 99, at(2024, 2, 2), "Outside window");

        let report = FinancialReport::generate(
            &fx.storage,
            &request(&fx, ReportPeriod::Month, at(2024, 1, 25)),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.summary.total_income, Money::from_units(2000));
        assert_eq!(report.summary.total_expenses, Money::from_units(50));
        assert_eq!(report.summary.net_amount, Money::from_units(1950));
        assert_eq!(report.summary.savings_rate, 97.5);
        assert_eq!(report.transaction_count(), 2);

        assert_eq!(report.income_categories.len(), 1);
        assert_eq!(report.expense_categories[0].category_name, "Food");
        assert_eq!(report.monthly.len(), 1);

        assert_eq!(report.budgets.len(), 1);
        let food = &report.budgets[0].comparisons[0];
        assert!(food.overspent);
        assert_eq!(food.remaining, Money::from_units(-10));
    }

    #[test]
    fn test_quarter_spans_budget_months() {
        let fx = Fixture::with_january();
        fx.budget(fx.food.id, 100, 2024, 1);
        fx.budget(fx.food.id, 100, 2024, 3);
        fx.expense(fx.food.id, 30, at(2024, 3, 15), "March shop");

        let report = FinancialReport::generate(
            &fx.storage,
            &request(&fx, ReportPeriod::Quarter, at(2024, 2, 10)),
            &CancelToken::new(),
        )
        .unwrap();

        assert_eq!(report.range.start_date(), Some(crate::testing::day(2024, 1, 1)));
        assert_eq!(report.range.end_date(), Some(crate::testing::day(2024, 3, 31)));
        let months: Vec<_> = report.budgets.iter().map(|b| b.month).collect();
        assert_eq!(months, vec![1, 3]);
        let labels: Vec<_> = report.monthly.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["2024-03", "2024-01"]);
    }

    #[test]
    fn test_serializes_figures() {
        let fx = Fixture::with_january();
        let now = Utc.with_ymd_and_hms(2024, 1, 31, 18, 0, 0).unwrap();
        let report = FinancialReport::generate(
            &fx.storage,
            &request(&fx, ReportPeriod::Year, now),
            &CancelToken::new(),
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["period"], "year");
        assert_eq!(json["summary"]["totalIncome"], "2000.00");
        assert_eq!(json["expenseCategories"][0]["total"], "50.00");
        assert!(json["budgets"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_empty_window_and_cancel() {
        let fx = Fixture::new();
        let report = FinancialReport::generate(
            &fx.storage,
            &request(&fx, ReportPeriod::Week, at(2024, 5, 8)),
            &CancelToken::new(),
        )
        .unwrap();
        assert_eq!(report.transaction_count(), 0);
        assert_eq!(report.summary.savings_rate, 0.0);

        let cancel = CancelToken::new();
        cancel.cancel();
        let err = FinancialReport::generate(
            &fx.storage,
            &request(&fx, ReportPeriod::Week, at(2024, 5, 8)),
            &cancel,
        )
        .unwrap_err();
        assert!(matches!(err, TallyError::Cancelled));
    }
}
