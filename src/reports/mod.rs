//! Reports module for Tallybook
//!
//! The aggregation engine: per-category totals, monthly trends, period
//! summaries and budget-versus-actual comparisons. Every report reads through
//! [`crate::storage::EntityStore`] and is computed fresh per request.

pub mod budget_comparison;
pub mod category_breakdown;
pub mod monthly_trend;
pub mod period_summary;
pub mod statistics;

pub use budget_comparison::{BudgetComparison, BudgetComparisonReport};
pub use category_breakdown::{BreakdownFilter, CategoryBreakdownEntry, CategoryBreakdownReport};
pub use monthly_trend::{MonthlyTotals, MonthlyTrendReport, TREND_MONTHS};
pub use period_summary::PeriodSummaryReport;
pub use statistics::StatisticsReport;
