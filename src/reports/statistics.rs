//! Statistics Report
//!
//! Everything the statistics view shows in one pass: the category breakdown
//! for the selected period, the twelve-month trend and this month's summary.

use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::error::TallyResult;
use crate::models::UserId;
use crate::storage::EntityStore;

use super::category_breakdown::{BreakdownFilter, CategoryBreakdownReport};
use super::monthly_trend::MonthlyTrendReport;
use super::period_summary::PeriodSummaryReport;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub category_breakdown: CategoryBreakdownReport,
    pub monthly_series: MonthlyTrendReport,
    pub current_period: PeriodSummaryReport,
}

impl StatisticsReport {
    pub fn generate(
        store: &dyn EntityStore,
        user_id: UserId,
        filter: &BreakdownFilter,
    ) -> TallyResult<Self> {
        Self::generate_at(store, user_id, filter, Utc::now().date_naive())
    }

    pub fn generate_at(
        store: &dyn EntityStore,
        user_id: UserId,
        filter: &BreakdownFilter,
        as_of: NaiveDate,
    ) -> TallyResult<Self> {
        Ok(Self {
            category_breakdown: CategoryBreakdownReport::generate_at(store, user_id, filter, as_of)?,
            monthly_series: MonthlyTrendReport::generate(store, user_id)?,
            current_period: PeriodSummaryReport::generate_at(store, user_id, as_of)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, StatsPeriod};
    use crate::testing::{at, day, Fixture};

    #[test]
    fn test_combined_result() {
        let fx = Fixture::with_january();
        fx.expense(fx.food.id, 15, at(2023, 11, 2), "Old lunch");

        let stats = StatisticsReport::generate_at(
            &fx.storage,
            fx.user,
            &BreakdownFilter::for_period(StatsPeriod::month(2024, 1)),
            day(2024, 1, 25),
        )
        .unwrap();

        assert_eq!(stats.category_breakdown.entries.len(), 2);
        assert_eq!(stats.monthly_series.months.len(), 2);
        assert_eq!(stats.current_period.savings(), Money::from_units(1950));

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["current_period"]["income"], "2000.00");
        assert_eq!(json["monthly_series"]["months"][0]["month"], 1);
    }
}
