//! Suggested download filenames

use chrono::{DateTime, Utc};

use super::theme::ThemeName;
use super::ExportFormat;

fn base_name(format: ExportFormat) -> &'static str {
    match format {
        ExportFormat::Csv | ExportFormat::Xlsx => "expenses",
        ExportFormat::Pdf => "expenses-report",
        ExportFormat::Json => "expenses-data",
        ExportFormat::FinancialReport => "financial-report",
    }
}

/// `<base>[-<period>][-<theme>]-<YYYY-MM-DD-HHmmss>.<ext>`
///
/// The theme suffix is left out for the default theme, the period suffix
/// when `period` is empty.
pub fn export_filename(
    format: ExportFormat,
    period: &str,
    theme: ThemeName,
    at: DateTime<Utc>,
) -> String {
    let mut name = base_name(format).to_string();
    if !period.is_empty() {
        name.push('-');
        name.push_str(period);
    }
    if theme != ThemeName::Default {
        name.push('-');
        name.push_str(theme.as_str());
    }
    format!(
        "{}-{}.{}",
        name,
        at.format("%Y-%m-%d-%H%M%S"),
        format.extension()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_filenames() {
        let at = Utc.with_ymd_and_hms(2024, 1, 31, 14, 5, 9).unwrap();

        assert_eq!(
            export_filename(ExportFormat::Csv, "all", ThemeName::Default, at),
            "expenses-all-2024-01-31-140509.csv"
        );
        assert_eq!(
            export_filename(ExportFormat::Xlsx, "custom", ThemeName::Default, at),
            "expenses-custom-2024-01-31-140509.xlsx"
        );
        assert_eq!(
            export_filename(ExportFormat::Pdf, "custom", ThemeName::Modern, at),
            "expenses-report-custom-modern-2024-01-31-140509.pdf"
        );
        assert_eq!(
            export_filename(ExportFormat::Json, "all", ThemeName::Default, at),
            "expenses-data-all-2024-01-31-140509.json"
        );
        assert_eq!(
            export_filename(ExportFormat::FinancialReport, "quarter", ThemeName::Minimal, at),
            "financial-report-quarter-minimal-2024-01-31-140509.json"
        );
        assert_eq!(
            export_filename(ExportFormat::Csv, "", ThemeName::Default, at),
            "expenses-2024-01-31-140509.csv"
        );
    }
}
