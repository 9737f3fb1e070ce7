//! Export filters and options
//!
//! [`ExportFilters`] and [`ExportOptions`] carry the raw strings a caller
//! received (query parameters, CLI flags). Normalizing them validates every
//! value up front so a malformed request never produces a partial export.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::config::Settings;
use crate::error::{TallyError, TallyResult};
use crate::models::range::{end_of_day, start_of_day};
use crate::models::{Category, CategoryId, DateRange, ReportPeriod, TransactionKind, UserId};
use crate::storage::{EntityStore, TransactionQuery};

use super::pdf::PaperSize;
use super::theme::Theme;

/// Display format for dates in filter summaries ("Jan 5, 2024")
const SUMMARY_DATE: &str = "%b %-d, %Y";

/// Raw filter values as received
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFilters {
    /// "income" or "expense"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Category id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Case-insensitive description substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Clone, Copy)]
enum Bound {
    Start,
    End,
}

fn parse_bound(field: &str, raw: &str, bound: Bound) -> TallyResult<DateTime<Utc>> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(match bound {
            Bound::Start => start_of_day(date),
            Bound::End => end_of_day(date),
        });
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            TallyError::Validation(format!(
                "Invalid {} '{}': expected YYYY-MM-DD or an RFC 3339 timestamp",
                field, raw
            ))
        })
}

impl ExportFilters {
    pub fn is_empty(&self) -> bool {
        [
            &self.kind,
            &self.category,
            &self.start_date,
            &self.end_date,
            &self.search,
        ]
        .iter()
        .all(|v| non_blank(v).is_none())
    }

    /// Validate and resolve against the store
    ///
    /// Dates must parse, the type must be income/expense, and a category
    /// must exist and belong to `user_id`.
    pub fn normalize(
        &self,
        store: &dyn EntityStore,
        user_id: UserId,
    ) -> TallyResult<AppliedFilters> {
        let start = non_blank(&self.start_date)
            .map(|raw| parse_bound("startDate", raw, Bound::Start))
            .transpose()?;
        let end = non_blank(&self.end_date)
            .map(|raw| parse_bound("endDate", raw, Bound::End))
            .transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(TallyError::Validation(format!(
                    "startDate {} is after endDate {}",
                    start.date_naive(),
                    end.date_naive()
                )));
            }
        }

        let kind = non_blank(&self.kind)
            .map(TransactionKind::from_str)
            .transpose()
            .map_err(TallyError::Validation)?;

        let category = match non_blank(&self.category) {
            None => None,
            Some(raw) => {
                let id = CategoryId::from_str(raw).map_err(|_| {
                    TallyError::Validation(format!("Invalid category id '{}'", raw))
                })?;
                let category = store
                    .find_category(user_id, id)?
                    .ok_or_else(|| TallyError::category_not_found(raw))?;
                Some(category)
            }
        };

        Ok(AppliedFilters {
            range: DateRange::new(start, end),
            kind,
            category,
            search: non_blank(&self.search).map(str::to_string),
        })
    }
}

/// Filters after validation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFilters {
    pub range: DateRange,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    #[serde(serialize_with = "category_ref")]
    pub category: Option<Category>,
    pub search: Option<String>,
}

fn category_ref<S: serde::Serializer>(
    category: &Option<Category>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    struct CategoryRef<'a> {
        id: CategoryId,
        name: &'a str,
    }

    category
        .as_ref()
        .map(|c| CategoryRef {
            id: c.id,
            name: &c.name,
        })
        .serialize(serializer)
}

impl AppliedFilters {
    pub fn is_empty(&self) -> bool {
        self.range.is_unbounded()
            && self.kind.is_none()
            && self.category.is_none()
            && self.search.is_none()
    }

    pub fn query(&self) -> TransactionQuery {
        TransactionQuery {
            range: self.range,
            kind: self.kind,
            category_id: self.category.as_ref().map(|c| c.id),
            search: self.search.clone(),
        }
    }

    /// "custom" when both dates are given, otherwise "all"
    pub fn period_label(&self) -> &'static str {
        if self.range.is_closed() {
            "custom"
        } else {
            "all"
        }
    }

    /// Human-readable lines for the "filters applied" block
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        let fmt = |d: NaiveDate| d.format(SUMMARY_DATE).to_string();
        match (self.range.start_date(), self.range.end_date()) {
            (Some(start), Some(end)) => {
                lines.push(format!("Date Range: {} - {}", fmt(start), fmt(end)))
            }
            (Some(start), None) => lines.push(format!("Date Range: From {}", fmt(start))),
            (None, Some(end)) => lines.push(format!("Date Range: Until {}", fmt(end))),
            (None, None) => {}
        }
        if let Some(kind) = self.kind {
            lines.push(format!("Type: {}", kind.label()));
        }
        if let Some(category) = &self.category {
            lines.push(format!("Category: {}", category.name));
        }
        if let Some(search) = &self.search {
            lines.push(format!("Search: \"{}\"", search));
        }

        lines
    }
}

/// Raw presentation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Theme preset; the configured default when unset
    pub theme: Option<String>,
    pub include_summary: bool,
    /// Paper size for PDF output; the configured default when unset
    pub paper_size: Option<String>,
    /// week, month, quarter or year; financial report only
    pub period: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            theme: None,
            include_summary: true,
            paper_size: None,
            period: None,
        }
    }
}

impl ExportOptions {
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_paper_size(mut self, paper_size: impl Into<String>) -> Self {
        self.paper_size = Some(paper_size.into());
        self
    }

    pub fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    pub fn without_summary(mut self) -> Self {
        self.include_summary = false;
        self
    }

    /// Apply configured defaults and validate
    ///
    /// Unknown themes fall back to the default preset; unknown paper sizes
    /// and periods are rejected.
    pub fn resolve(&self, settings: &Settings) -> TallyResult<ResolvedOptions> {
        let theme = Theme::resolve(non_blank(&self.theme).unwrap_or(settings.default_theme.as_str()));
        let paper = PaperSize::parse(
            non_blank(&self.paper_size).unwrap_or(settings.default_paper_size.as_str()),
        )?;
        let period = non_blank(&self.period)
            .map(ReportPeriod::from_str)
            .transpose()
            .map_err(TallyError::Validation)?
            .unwrap_or_default();

        Ok(ResolvedOptions {
            theme,
            include_summary: self.include_summary,
            paper,
            period,
        })
    }
}

/// Options after defaults and validation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOptions {
    pub theme: Theme,
    pub include_summary: bool,
    pub paper: PaperSize,
    pub period: ReportPeriod,
}

impl Default for ResolvedOptions {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            include_summary: true,
            paper: PaperSize::A4,
            period: ReportPeriod::default(),
        }
    }
}
