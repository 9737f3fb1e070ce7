//! Named reporting periods
//!
//! The financial report covers a calendar-aligned week, month, quarter or
//! year around a reference date.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::range::{month_end, DateRange};

/// A calendar-aligned reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

impl ReportPeriod {
    pub fn all() -> &'static [Self] {
        &[Self::Week, Self::Month, Self::Quarter, Self::Year]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// The window containing `as_of`
    ///
    /// `first_day_of_week` is 0 for Sunday through 6 for Saturday and only
    /// matters for [`ReportPeriod::Week`].
    pub fn range(&self, as_of: NaiveDate, first_day_of_week: u8) -> DateRange {
        let (first, last) = match self {
            Self::Week => {
                let offset = (as_of.weekday().num_days_from_sunday() + 7
                    - u32::from(first_day_of_week % 7))
                    % 7;
                let first = as_of - Duration::days(i64::from(offset));
                (first, first + Duration::days(6))
            }
            Self::Month => {
                let last = month_end(as_of.year(), as_of.month()).unwrap_or(as_of);
                (as_of.with_day(1).unwrap_or(as_of), last)
            }
            Self::Quarter => {
                let first_month = (as_of.month() - 1) / 3 * 3 + 1;
                let first = NaiveDate::from_ymd_opt(as_of.year(), first_month, 1).unwrap_or(as_of);
                let last = month_end(as_of.year(), first_month + 2).unwrap_or(as_of);
                (first, last)
            }
            Self::Year => {
                let first = NaiveDate::from_ymd_opt(as_of.year(), 1, 1).unwrap_or(as_of);
                let last = NaiveDate::from_ymd_opt(as_of.year(), 12, 31).unwrap_or(as_of);
                (first, last)
            }
        };
        DateRange::days(first, last)
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" => Ok(Self::Quarter),
            "year" => Ok(Self::Year),
            other => Err(format!(
                "Invalid period '{}': expected week, month, quarter or year",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn bounds(range: DateRange) -> (NaiveDate, NaiveDate) {
        (range.start_date().unwrap(), range.end_date().unwrap())
    }

    #[test]
    fn test_week_starting_sunday() {
        // 2024-01-17 is a Wednesday
        let range = ReportPeriod::Week.range(date(2024, 1, 17), 0);
        assert_eq!(bounds(range), (date(2024, 1, 14), date(2024, 1, 20)));
    }

    #[test]
    fn test_week_starting_monday() {
        let range = ReportPeriod::Week.range(date(2024, 1, 14), 1);
        assert_eq!(bounds(range), (date(2024, 1, 8), date(2024, 1, 14)));
    }

    #[test]
    fn test_month() {
        let range = ReportPeriod::Month.range(date(2024, 2, 10), 0);
        assert_eq!(bounds(range), (date(2024, 2, 1), date(2024, 2, 29)));
    }

    #[test]
    fn test_quarter_is_calendar_aligned() {
        let range = ReportPeriod::Quarter.range(date(2024, 5, 20), 0);
        assert_eq!(bounds(range), (date(2024, 4, 1), date(2024, 6, 30)));

        let range = ReportPeriod::Quarter.range(date(2024, 12, 31), 0);
        assert_eq!(bounds(range), (date(2024, 10, 1), date(2024, 12, 31)));
    }

    #[test]
    fn test_year() {
        let range = ReportPeriod::Year.range(date(2024, 7, 4), 0);
        assert_eq!(bounds(range), (date(2024, 1, 1), date(2024, 12, 31)));
    }

    #[test]
    fn test_parse() {
        assert_eq!("Quarter".parse::<ReportPeriod>(), Ok(ReportPeriod::Quarter));
        assert!("fortnight".parse::<ReportPeriod>().is_err());
    }
}
