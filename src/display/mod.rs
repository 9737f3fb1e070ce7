//! Display formatting for terminal output
//!
//! Turns reports and export results into text tables for the CLI.

pub mod export;
pub mod report;

pub use export::{format_artifact_summary, format_theme_list};
pub use report::{
    format_budget_comparison, format_category_breakdown, format_monthly_trend,
    format_period_summary, format_statistics,
};
