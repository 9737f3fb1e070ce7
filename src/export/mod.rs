//! Export module for Tallybook
//!
//! Report renderers for the supported output formats:
//! - CSV: transaction rows with an optional summary preamble
//! - XLSX: Summary and Transactions worksheets
//! - PDF: themed, paginated transaction report
//! - JSON: filtered transactions with joined categories and totals
//! - Financial report: JSON document of aggregated figures for a named period
//!
//! Renderers are pure: they take already-fetched rows plus totals and return
//! bytes. [`crate::services::ExportService`] wires filters, the store and a
//! renderer together.

pub mod cancel;
pub mod csv;
pub mod data;
pub mod filename;
pub mod filters;
pub mod financial;
pub mod pdf;
pub mod theme;
pub mod xlsx;

pub use self::cancel::CancelToken;
pub use self::csv::CsvRenderer;
pub use self::data::DataRenderer;
pub use self::filename::export_filename;
pub use self::filters::{AppliedFilters, ExportFilters, ExportOptions, ResolvedOptions};
pub use self::financial::FinancialReport;
pub use self::pdf::{PaperSize, PdfRenderer};
pub use self::theme::{available_themes, Theme, ThemeInfo, ThemeName};
pub use self::xlsx::XlsxRenderer;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{TallyError, TallyResult};
use crate::models::Category;
use crate::reports::PeriodSummaryReport;
use crate::storage::JoinedTransaction;

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    Csv,
    Xlsx,
    Pdf,
    Json,
    FinancialReport,
}

impl ExportFormat {
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Csv,
            ExportFormat::Xlsx,
            ExportFormat::Pdf,
            ExportFormat::Json,
            ExportFormat::FinancialReport,
        ]
    }

    pub fn supported_names() -> Vec<&'static str> {
        Self::all().iter().map(|f| f.as_str()).collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json => "json",
            ExportFormat::FinancialReport => "financial-report",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Json | ExportFormat::FinancialReport => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Pdf => "pdf",
            ExportFormat::Json | ExportFormat::FinancialReport => "json",
        }
    }

    /// Second accepted name
    fn alias(&self) -> Option<&'static str> {
        match self {
            ExportFormat::Xlsx => Some("excel"),
            ExportFormat::FinancialReport => Some("financial"),
            _ => None,
        }
    }

    /// Export kind recorded in metadata
    pub fn export_type(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "excel",
            ExportFormat::FinancialReport => "financial_report",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = TallyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.as_str() == wanted || f.alias() == Some(wanted.as_str()))
            .ok_or_else(|| TallyError::UnsupportedFormat {
                requested: s.trim().to_string(),
                supported: Self::supported_names(),
            })
    }
}

/// Everything a renderer needs for one export
pub struct RenderContext<'a> {
    /// Newest first
    pub transactions: &'a [JoinedTransaction],
    /// Totals over `transactions`
    pub summary: &'a PeriodSummaryReport,
    pub filters: &'a AppliedFilters,
    pub options: &'a ResolvedOptions,
    pub currency: &'a str,
    pub generated_at: DateTime<Utc>,
    pub cancel: &'a CancelToken,
}

/// A serializer for one output format
///
/// Implementations build the whole payload in memory and return it only on
/// success; on error the partial buffer is dropped.
pub trait ReportRenderer {
    fn format(&self) -> ExportFormat;

    fn render(&self, ctx: &RenderContext<'_>) -> TallyResult<Vec<u8>>;
}

/// The joined category of a row, or a render error when it did not resolve
pub(crate) fn joined_category(row: &JoinedTransaction) -> TallyResult<&Category> {
    row.category.as_ref().ok_or_else(|| {
        TallyError::Render(format!(
            "transaction {} references category {} which could not be resolved",
            row.transaction.id, row.transaction.category_id
        ))
    })
}

/// Descriptive fields attached to every artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub export_type: &'static str,
    pub theme: ThemeName,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_size: Option<&'static str>,
    pub period: String,
    pub record_count: usize,
    pub export_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<AppliedFilters>,
}

/// A finished export
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
    pub metadata: ExportMetadata,
}

impl ExportArtifact {
    /// Value for a `Content-Disposition` header
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}
