//! Date windows used by aggregation and export
//!
//! All calendar math is UTC. A window is inclusive on both ends and either
//! end may be open. Day-granular windows run from 00:00:00.000 on the first
//! day through 23:59:59.999 on the last.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive, optionally open-ended time window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// First instant of a UTC calendar day
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Last millisecond of a UTC calendar day
pub fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    start_of_day(date) + Duration::milliseconds(86_399_999)
}

/// Last day of a calendar month, `None` for an invalid month
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

impl DateRange {
    /// A window with no bounds
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Whole days from `first` through `last`
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        Self {
            start: Some(start_of_day(first)),
            end: Some(end_of_day(last)),
        }
    }

    /// One calendar month
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self::days(first, month_end(year, month)?))
    }

    /// One calendar year
    pub fn year(year: i32) -> Option<Self> {
        Some(Self::days(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        ))
    }

    /// The calendar month containing `as_of`
    pub fn current_month(as_of: NaiveDate) -> Self {
        let first = as_of.with_day(1).unwrap_or(as_of);
        let last = month_end(as_of.year(), as_of.month()).unwrap_or(as_of);
        Self::days(first, last)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Both ends given
    pub fn is_closed(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| *at >= start) && self.end.map_or(true, |end| *at <= end)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.map(|s| s.date_naive())
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end.map(|e| e.date_naive())
    }

    /// Calendar months (year, month) the window touches, oldest first
    ///
    /// Empty for windows with an open end.
    pub fn months(&self) -> Vec<(i32, u32)> {
        let (Some(first), Some(last)) = (self.start_date(), self.end_date()) else {
            return Vec::new();
        };

        let mut months = Vec::new();
        let (mut year, mut month) = (first.year(), first.month());
        while (year, month) <= (last.year(), last.month()) {
            months.push((year, month));
            if month == 12 {
                year += 1;
                month = 1;
            } else {
                month += 1;
            }
        }
        months
    }
}

/// The year/month selector used by the statistics view
///
/// A month narrows the window to that calendar month; without one the whole
/// year is covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsPeriod {
    pub year: i32,
    pub month: Option<u32>,
}

impl StatsPeriod {
    pub fn month(year: i32, month: u32) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }

    pub fn year(year: i32) -> Self {
        Self { year, month: None }
    }

    /// Resolve to a window, `None` for an invalid month
    pub fn range(&self) -> Option<DateRange> {
        match self.month {
            Some(month) => DateRange::month(self.year, month),
            None => DateRange::year(self.year),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_bounds() {
        let range = DateRange::days(date(2024, 1, 1), date(2024, 1, 31));
        assert_eq!(
            range.start,
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        let end = range.end.unwrap();
        assert_eq!(end.to_rfc3339(), "2024-01-31T23:59:59.999+00:00");
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::month(2024, 1).unwrap();
        assert!(range.contains(&Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert!(range.contains(&end_of_day(date(2024, 1, 31))));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn test_open_ends() {
        let since = DateRange::new(Some(start_of_day(date(2024, 1, 1))), None);
        assert!(since.contains(&Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap()));
        assert!(!since.contains(&Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap()));
        assert!(DateRange::unbounded().contains(&Utc::now()));
    }

    #[test]
    fn test_month_end_handles_leap_years_and_december() {
        assert_eq!(month_end(2024, 2), Some(date(2024, 2, 29)));
        assert_eq!(month_end(2023, 2), Some(date(2023, 2, 28)));
        assert_eq!(month_end(2024, 12), Some(date(2024, 12, 31)));
        assert_eq!(month_end(2024, 13), None);
    }

    #[test]
    fn test_current_month() {
        let range = DateRange::current_month(date(2024, 3, 17));
        assert_eq!(range.start_date(), Some(date(2024, 3, 1)));
        assert_eq!(range.end_date(), Some(date(2024, 3, 31)));
    }

    #[test]
    fn test_months_spanned() {
        let range = DateRange::days(date(2023, 11, 15), date(2024, 2, 1));
        assert_eq!(
            range.months(),
            vec![(2023, 11), (2023, 12), (2024, 1), (2024, 2)]
        );
        assert!(DateRange::unbounded().months().is_empty());
    }

    #[test]
    fn test_stats_period() {
        let jan = StatsPeriod::month(2024, 1).range().unwrap();
        assert_eq!(jan.end_date(), Some(date(2024, 1, 31)));

        let year = StatsPeriod::year(2024).range().unwrap();
        assert_eq!(year.start_date(), Some(date(2024, 1, 1)));
        assert_eq!(year.end_date(), Some(date(2024, 12, 31)));

        assert!(StatsPeriod::month(2024, 0).range().is_none());
    }
}
