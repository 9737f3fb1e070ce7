//! XLSX export
//!
//! A workbook with an optional `Summary` sheet (totals and applied filters)
//! and a `Transactions` sheet holding one row per transaction. Amounts are
//! written as numbers so spreadsheets can total them.

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};

use crate::error::{TallyError, TallyResult};

use super::csv::CSV_HEADERS;
use super::{joined_category, ExportFormat, RenderContext, ReportRenderer};

pub const SUMMARY_SHEET: &str = "Summary";
pub const TRANSACTIONS_SHEET: &str = "Transactions";

/// Column widths of the transaction sheet, in characters
const COLUMN_WIDTHS: [f64; 8] = [12.0, 30.0, 15.0, 10.0, 12.0, 15.0, 20.0, 20.0];

#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxRenderer;

fn render_error(e: XlsxError) -> TallyError {
    TallyError::Render(format!("XLSX: {}", e))
}

/// `#RRGGBB` to a workbook colour
fn color(hex: &str) -> Color {
    Color::RGB(u32::from_str_radix(hex.trim_start_matches('#'), 16).unwrap_or(0))
}

impl XlsxRenderer {
    fn summary_sheet(&self, ctx: &RenderContext<'_>) -> Result<Worksheet, XlsxError> {
        let money = |m: crate::models::Money| m.format_with_symbol(ctx.currency);
        let bold = Format::new().set_bold();

        let mut sheet = Worksheet::new();
        sheet.set_name(SUMMARY_SHEET)?;
        sheet.set_column_width(0, 20)?;
        sheet.set_column_width(1, 30)?;

        sheet.write_string_with_format(0, 0, "EXPENSE TRACKER EXPORT", &bold)?;
        sheet.write_string(1, 0, "Generated on:")?;
        sheet.write_string(
            1,
            1,
            ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        )?;

        sheet.write_string_with_format(3, 0, "SUMMARY", &bold)?;
        sheet.write_string(4, 0, "Total Records:")?;
        sheet.write_number(4, 1, ctx.summary.count as f64)?;
        let totals = [
            ("Total Income:", ctx.summary.income),
            ("Total Expenses:", ctx.summary.expenses),
            ("Net Amount:", ctx.summary.net()),
        ];
        let mut row = 5;
        for (label, amount) in totals {
            sheet.write_string(row, 0, label)?;
            sheet.write_string(row, 1, money(amount))?;
            row += 1;
        }

        let lines = ctx.filters.summary_lines();
        if !lines.is_empty() {
            row += 1;
            sheet.write_string_with_format(row, 0, "FILTERS APPLIED:", &bold)?;
            for line in lines {
                row += 1;
                match line.split_once(": ") {
                    Some((label, value)) => {
                        sheet.write_string(row, 0, format!("{}:", label))?;
                        sheet.write_string(row, 1, value)?;
                    }
                    None => {
                        sheet.write_string(row, 0, line)?;
                    }
                }
            }
        }

        Ok(sheet)
    }

    fn transactions_sheet(&self, ctx: &RenderContext<'_>) -> TallyResult<Worksheet> {
        let header = Format::new()
            .set_bold()
            .set_font_color(Color::White)
            .set_background_color(color(ctx.options.theme.colors.primary));
        let amount = Format::new().set_num_format("0.00");

        let mut sheet = Worksheet::new();
        sheet.set_name(TRANSACTIONS_SHEET).map_err(render_error)?;
        for (col, (name, width)) in CSV_HEADERS.iter().zip(COLUMN_WIDTHS).enumerate() {
            let col = col as u16;
            sheet
                .write_string_with_format(0, col, *name, &header)
                .map_err(render_error)?;
            sheet.set_column_width(col, width).map_err(render_error)?;
        }

        for (i, row) in ctx.transactions.iter().enumerate() {
            ctx.cancel.check()?;

            let txn = &row.transaction;
            let category = joined_category(row)?;
            let formatted = if txn.is_expense() {
                format!("-{}", txn.amount.format_with_symbol(ctx.currency))
            } else {
                txn.amount.format_with_symbol(ctx.currency)
            };
            let r = i as u32 + 1;

            let write = |sheet: &mut Worksheet| -> Result<(), XlsxError> {
                sheet.write_string(r, 0, txn.date.format("%Y-%m-%d").to_string())?;
                sheet.write_string(r, 1, &txn.description)?;
                sheet.write_string(r, 2, &category.name)?;
                sheet.write_string(r, 3, txn.kind.label())?;
                sheet.write_number_with_format(r, 4, txn.amount.cents() as f64 / 100.0, &amount)?;
                sheet.write_string(r, 5, &formatted)?;
                sheet.write_string(r, 6, txn.joined_tags())?;
                sheet.write_string(r, 7, txn.created_at.format("%Y-%m-%d %H:%M:%S").to_string())?;
                Ok(())
            };
            write(&mut sheet).map_err(render_error)?;
        }

        Ok(sheet)
    }
}

impl ReportRenderer for XlsxRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TallyResult<Vec<u8>> {
        let mut workbook = Workbook::new();
        if ctx.options.include_summary {
            workbook.push_worksheet(self.summary_sheet(ctx).map_err(render_error)?);
        }
        workbook.push_worksheet(self.transactions_sheet(ctx)?);

        workbook.save_to_buffer().map_err(render_error)
    }
}
