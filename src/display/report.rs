//! Report formatting for terminal output

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Money, TransactionKind};
use crate::reports::{
    BudgetComparisonReport, CategoryBreakdownReport, MonthlyTrendReport, PeriodSummaryReport,
    StatisticsReport,
};

const BAR_WIDTH: usize = 20;

/// Format a percentage with appropriate precision
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 && pct < 0.1 {
        format!("{:.2}%", pct)
    } else if pct < 10.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Horizontal bar for a share out of 100
pub fn format_bar(pct: f64, width: usize) -> String {
    if pct <= 0.0 {
        return " ".repeat(width);
    }
    let filled = ((pct / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn money(amount: Money, currency: &str) -> String {
    amount.format_with_symbol(currency)
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

pub fn format_category_breakdown(report: &CategoryBreakdownReport, currency: &str) -> String {
    if report.is_empty() {
        return "No transactions in this period.\n".to_string();
    }

    let rows = report.entries.iter().map(|e| BreakdownRow {
        name: e.category_name.clone(),
        kind: e.kind.label(),
        total: money(e.total, currency),
        count: e.count,
        share: format_percentage(e.percentage),
        bar: format_bar(e.percentage, BAR_WIDTH),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    label: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Savings")]
    savings: String,
}

pub fn format_monthly_trend(report: &MonthlyTrendReport, currency: &str) -> String {
    if report.is_empty() {
        return "No monthly history yet.\n".to_string();
    }

    let rows = report.months.iter().map(|m| MonthRow {
        label: m.label(),
        income: money(m.income, currency),
        expenses: money(m.expenses, currency),
        savings: money(m.savings(), currency),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

pub fn format_period_summary(summary: &PeriodSummaryReport, currency: &str) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Income:       {:>14}  ({} transactions)\n",
        money(summary.income, currency),
        summary.income_count
    ));
    output.push_str(&format!(
        "Expenses:     {:>14}  ({} transactions)\n",
        money(summary.expenses, currency),
        summary.expense_count
    ));
    output.push_str(&format!(
        "Savings:      {:>14}\n",
        money(summary.savings(), currency)
    ));
    output.push_str(&format!(
        "Savings rate: {:>14}\n",
        format_percentage(summary.savings_rate())
    ));
    output
}

#[derive(Tabled)]
struct BudgetRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Budget")]
    budgeted: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Used")]
    used: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

pub fn format_budget_comparison(report: &BudgetComparisonReport, currency: &str) -> String {
    let mut output = format!("Budgets for {}-{:02}\n", report.year, report.month);

    if report.comparisons.is_empty() {
        output.push_str("No budgets set for this month.\n");
        return output;
    }

    let rows = report.comparisons.iter().map(|c| BudgetRow {
        name: c
            .category_name
            .clone()
            .unwrap_or_else(|| c.budget.category_id.short()),
        budgeted: money(c.budget.amount, currency),
        spent: money(c.actual_spending, currency),
        remaining: money(c.remaining, currency),
        used: format_percentage(c.percent_used()),
        status: if c.overspent { "OVER" } else { "ok" },
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    output.push_str(&format!("{}\n", table));
    output.push_str(&format!(
        "Total: {} of {} spent\n",
        money(report.total_spent(), currency),
        money(report.total_budgeted(), currency)
    ));
    output
}

/// Full statistics view: current period, categories by kind, monthly series
pub fn format_statistics(report: &StatisticsReport, currency: &str) -> String {
    let mut output = String::new();

    output.push_str("This month\n");
    output.push_str(&format_period_summary(&report.current_period, currency));
    output.push('\n');

    for kind in [TransactionKind::Expense, TransactionKind::Income] {
        let entries = report.category_breakdown.of_kind(kind);
        if entries.is_empty() {
            continue;
        }
        let section = CategoryBreakdownReport {
            range: report.category_breakdown.range,
            entries,
        };
        output.push_str(&format!("{} by category\n", kind.label()));
        output.push_str(&format_category_breakdown(&section, currency));
        output.push('\n');
    }
    if report.category_breakdown.is_empty() {
        output.push_str(&format_category_breakdown(&report.category_breakdown, currency));
        output.push('\n');
    }

    output.push_str("Monthly\n");
    output.push_str(&format_monthly_trend(&report.monthly_series, currency));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatsPeriod;
    use crate::reports::BreakdownFilter;
    use crate::testing::{day, Fixture};

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.05), "0.05%");
        assert_eq!(format_percentage(2.5), "2.5%");
        assert_eq!(format_percentage(97.5), "98%");
    }

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(50.0, 10), "█████░░░░░");
        assert_eq!(format_bar(0.0, 4), "    ");
        assert_eq!(format_bar(150.0, 4), "████");
    }

    #[test]
    fn test_breakdown_table() {
        let fx = Fixture::with_january();
        let report = CategoryBreakdownReport::generate_at(
            &fx.storage,
            fx.user,
            &BreakdownFilter::for_period(StatsPeriod::month(2024, 1)),
            day(2024, 1, 31),
        )
        .unwrap();

        let text = format_category_breakdown(&report, "$");
        assert!(text.contains("Category"));
        assert!(text.contains("Salary"));
        assert!(text.contains("$2000.00"));
        assert!(text.contains("100%"));
    }

    #[test]
    fn test_budget_table_marks_overspent() {
        let fx = Fixture::with_january();
        fx.budget(fx.food.id, 40, 2024, 1);
        let report = BudgetComparisonReport::generate(&fx.storage, fx.user, 2024, 1).unwrap();

        let text = format_budget_comparison(&report, "$");
        assert!(text.starts_with("Budgets for 2024-01\n"));
        assert!(text.contains("OVER"));
        assert!(text.contains("-$10.00"));
        assert!(text.contains("Total: $50.00 of $40.00 spent"));
    }

    #[test]
    fn test_empty_outputs() {
        let fx = Fixture::new();
        let report = BudgetComparisonReport::generate(&fx.storage, fx.user, 2024, 2).unwrap();
        assert!(format_budget_comparison(&report, "$").contains("No budgets set"));
        assert_eq!(
            format_monthly_trend(&MonthlyTrendReport::default(), "$"),
            "No monthly history yet.\n"
        );
    }
}
