//! CLI commands for statistics and budget comparisons

use chrono::{Datelike, NaiveDate, Utc};
use clap::Args;

use crate::config::Settings;
use crate::display::{format_budget_comparison, format_statistics};
use crate::error::{TallyError, TallyResult};
use crate::models::range::{end_of_day, start_of_day};
use crate::models::{CategoryId, DateRange, StatsPeriod, TransactionKind, UserId};
use crate::reports::{BreakdownFilter, BudgetComparisonReport, StatisticsReport};
use crate::storage::EntityStore;

#[derive(Args, Debug, Default)]
pub struct StatsArgs {
    /// Year to break down (defaults to the current month when omitted)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Month 1-12 within --year; the whole year when omitted
    #[arg(short, long, requires = "year")]
    pub month: Option<u32>,

    /// First day to include (YYYY-MM-DD); overrides --year/--month
    #[arg(long)]
    pub from: Option<String>,

    /// Last day to include (YYYY-MM-DD); overrides --year/--month
    #[arg(long)]
    pub to: Option<String>,

    /// Only income or expense transactions
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    /// Only this category (id)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Case-insensitive description search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_day(flag: &str, raw: &str) -> TallyResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        TallyError::Validation(format!(
            "Invalid {} date '{}': expected YYYY-MM-DD",
            flag, raw
        ))
    })
}

impl StatsArgs {
    fn range(&self) -> TallyResult<Option<DateRange>> {
        if self.from.is_none() && self.to.is_none() {
            return Ok(None);
        }
        let from = self.from.as_deref().map(|d| parse_day("--from", d)).transpose()?;
        let to = self.to.as_deref().map(|d| parse_day("--to", d)).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(TallyError::Validation(format!(
                    "--from {} is after --to {}",
                    from, to
                )));
            }
        }
        Ok(Some(DateRange::new(
            from.map(start_of_day),
            to.map(end_of_day),
        )))
    }

    fn to_filter(&self) -> TallyResult<BreakdownFilter> {
        let mut filter = BreakdownFilter {
            range: self.range()?,
            period: self.year.map(|year| StatsPeriod {
                year,
                month: self.month,
            }),
            ..BreakdownFilter::default()
        };
        if let Some(kind) = &self.kind {
            filter = filter.with_kind(kind.parse::<TransactionKind>().map_err(TallyError::Validation)?);
        }
        if let Some(category) = &self.category {
            let id = category.parse::<CategoryId>().map_err(|e| {
                TallyError::Validation(format!("Invalid category id '{}': {}", category, e))
            })?;
            filter = filter.with_category(id);
        }
        if let Some(search) = &self.search {
            filter = filter.with_search(search.clone());
        }
        Ok(filter)
    }
}

#[derive(Args, Debug, Default)]
pub struct BudgetsArgs {
    /// Year (defaults to the current one)
    #[arg(short, long)]
    pub year: Option<i32>,

    /// Month 1-12 (defaults to the current one)
    #[arg(short, long)]
    pub month: Option<u32>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Handle the stats command
pub fn handle_stats_command(
    store: &dyn EntityStore,
    settings: &Settings,
    user_id: UserId,
    args: StatsArgs,
) -> TallyResult<()> {
    let filter = args.to_filter()?;
    let report = StatisticsReport::generate(store, user_id, &filter)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_statistics(&report, &settings.currency_symbol));
    }
    Ok(())
}

/// Handle the budgets command
pub fn handle_budgets_command(
    store: &dyn EntityStore,
    settings: &Settings,
    user_id: UserId,
    args: BudgetsArgs,
) -> TallyResult<()> {
    let today = Utc::now().date_naive();
    let year = args.year.unwrap_or(today.year());
    let month = args.month.unwrap_or(today.month());
    let report = BudgetComparisonReport::generate(store, user_id, year, month)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_budget_comparison(&report, &settings.currency_symbol));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_args_to_filter() {
        let args = StatsArgs {
            year: Some(2024),
            month: Some(1),
            kind: Some("Expense".into()),
            search: Some("groc".into()),
            ..StatsArgs::default()
        };
        let filter = args.to_filter().unwrap();
        assert_eq!(filter.period, Some(StatsPeriod::month(2024, 1)));
        assert_eq!(filter.kind, Some(TransactionKind::Expense));
        assert_eq!(filter.search.as_deref(), Some("groc"));

        let bad = StatsArgs {
            kind: Some("transfer".into()),
            ..StatsArgs::default()
        };
        assert!(bad.to_filter().unwrap_err().is_validation());
    }

    #[test]
    fn test_day_bounds_become_range() {
        let args = StatsArgs {
            year: Some(2023),
            from: Some("2024-01-15".into()),
            to: Some("2024-02-10".into()),
            ..StatsArgs::default()
        };
        let filter = args.to_filter().unwrap();
        let day = |m, d| NaiveDate::from_ymd_opt(2024, m, d).unwrap();
        assert_eq!(filter.range, Some(DateRange::days(day(1, 15), day(2, 10))));

        let open = StatsArgs {
            from: Some("2024-01-15".into()),
            ..StatsArgs::default()
        };
        let range = open.to_filter().unwrap().range.unwrap();
        assert_eq!(range.start_date(), Some(day(1, 15)));
        assert_eq!(range.end_date(), None);

        let inverted = StatsArgs {
            from: Some("2024-02-10".into()),
            to: Some("2024-01-15".into()),
            ..StatsArgs::default()
        };
        assert!(inverted.to_filter().unwrap_err().is_validation());
        let garbled = StatsArgs {
            to: Some("10/02/2024".into()),
            ..StatsArgs::default()
        };
        assert!(garbled.to_filter().unwrap_err().is_validation());
    }
}
