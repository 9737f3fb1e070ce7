//! CSV export
//!
//! An optional plain-text summary preamble followed by one row per
//! transaction. The preamble ends with a `TRANSACTION DATA:` marker so
//! readers can skip straight to the table.

use std::io::Write;

use crate::error::{TallyError, TallyResult};

use super::{joined_category, ExportFormat, RenderContext, ReportRenderer};

/// Column headers of the transaction table
pub const CSV_HEADERS: [&str; 8] = [
    "Date",
    "Description",
    "Category",
    "Type",
    "Amount",
    "Amount Formatted",
    "Tags",
    "Created At",
];

/// Line separating the preamble from the table
pub const DATA_MARKER: &str = "TRANSACTION DATA:";

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvRenderer;

fn render_error(e: impl std::fmt::Display) -> TallyError {
    TallyError::Render(format!("CSV: {}", e))
}

impl CsvRenderer {
    fn write_preamble(&self, ctx: &RenderContext<'_>, out: &mut Vec<u8>) -> std::io::Result<()> {
        let money = |m: crate::models::Money| m.format_with_symbol(ctx.currency);

        writeln!(
            out,
            "EXPENSE TRACKER EXPORT - {}",
            ctx.generated_at.format("%B %-d %Y, %-I:%M:%S %p UTC")
        )?;
        writeln!(out, "Total Records: {}", ctx.summary.count)?;
        writeln!(out, "Total Income: {}", money(ctx.summary.income))?;
        writeln!(out, "Total Expenses: {}", money(ctx.summary.expenses))?;
        writeln!(out, "Net Amount: {}", money(ctx.summary.net()))?;
        writeln!(out)?;

        let lines = ctx.filters.summary_lines();
        if !lines.is_empty() {
            writeln!(out, "FILTERS APPLIED:")?;
            for line in lines {
                writeln!(out, "{}", line)?;
            }
            writeln!(out)?;
        }

        writeln!(out, "{}", DATA_MARKER)
    }
}

impl ReportRenderer for CsvRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Csv
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TallyResult<Vec<u8>> {
        let mut out = Vec::new();
        if ctx.options.include_summary {
            self.write_preamble(ctx, &mut out).map_err(render_error)?;
        }

        let mut writer = ::csv::WriterBuilder::new().from_writer(out);
        writer.write_record(CSV_HEADERS).map_err(render_error)?;

        for row in ctx.transactions {
            ctx.cancel.check()?;

            let txn = &row.transaction;
            let category = joined_category(row)?;
            let formatted = if txn.is_expense() {
                format!("-{}", txn.amount.format_with_symbol(ctx.currency))
            } else {
                txn.amount.format_with_symbol(ctx.currency)
            };

            writer
                .write_record([
                    txn.date.format("%Y-%m-%d").to_string(),
                    txn.description.clone(),
                    category.name.clone(),
                    txn.kind.label().to_string(),
                    txn.amount.to_decimal_string(),
                    formatted,
                    txn.joined_tags(),
                    txn.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                ])
                .map_err(render_error)?;
        }

        writer
            .into_inner()
            .map_err(|e| render_error(e.error()))
    }
}
