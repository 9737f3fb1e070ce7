//! PDF export
//!
//! A themed transaction report: title block with a theme badge, the applied
//! filters, three summary boxes, then a paginated table that repeats its
//! header row on every new page.

pub mod document;

pub use document::{Align, DocumentInfo, PaperSize, PdfDocument, Rgb};

use crate::error::TallyResult;
use crate::models::{Money, TransactionKind};

use super::theme::{Font, Theme};
use super::{joined_category, ExportFormat, RenderContext, ReportRenderer};

const MARGIN: f32 = 50.0;
const ROW_HEIGHT: f32 = 20.0;
/// Relative column widths, scaled to the printable width of the page
const COLUMNS: [(&str, f32, Align); 5] = [
    ("Date", 70.0, Align::Left),
    ("Description", 160.0, Align::Left),
    ("Category", 90.0, Align::Left),
    ("Type", 70.0, Align::Left),
    ("Amount", 60.0, Align::Right),
];
const BADGE_WIDTH: f32 = 100.0;
const BOX_GAP: f32 = 10.0;
const BOX_HEIGHT: f32 = 80.0;
const SHADE: &str = "#F9FAFB";
/// Rows stop this far above the bottom edge
const BOTTOM_RESERVE: f32 = 100.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

struct Layout<'t> {
    doc: PdfDocument,
    theme: &'t Theme,
}

impl<'t> Layout<'t> {
    fn color(hex: &str) -> Rgb {
        Rgb::hex(hex)
    }

    /// Width between the left and right margins
    fn content_width(&self) -> f32 {
        self.doc.width() - 2.0 * MARGIN
    }

    /// (title, width, align) per column, filling the content width
    fn columns(&self) -> [(&'static str, f32, Align); 5] {
        let total: f32 = COLUMNS.iter().map(|(_, w, _)| w).sum();
        let scale = self.content_width() / total;
        COLUMNS.map(|(title, width, align)| (title, width * scale, align))
    }

    fn text(&mut self, text: &str, x: f32, y: f32, width: f32, font: Font, size: f32, color: Rgb) {
        self.doc
            .text(text, x, y, width, (font, size, color), Align::Left);
    }

    fn header_block(&mut self, ctx: &RenderContext<'_>) {
        let theme = self.theme;
        let width = self.content_width();
        let badge_x = self.doc.width() - MARGIN - BADGE_WIDTH;

        self.text(
            "Expense Tracker Report",
            MARGIN,
            50.0,
            width - BADGE_WIDTH - 10.0,
            theme.fonts.header,
            20.0,
            Self::color(theme.colors.primary),
        );
        let generated = format!(
            "Generated on: {}",
            ctx.generated_at.format("%B %-d %Y, %-I:%M:%S %p UTC")
        );
        self.text(
            &generated,
            MARGIN,
            75.0,
            width,
            theme.fonts.body,
            10.0,
            Self::color(theme.colors.secondary),
        );

        self.doc.fill_rect(
            badge_x,
            45.0,
            BADGE_WIDTH,
            20.0,
            Self::color(theme.colors.primary),
        );
        let badge = format!("THEME: {}", theme.name.as_str().to_uppercase());
        self.text(
            &badge,
            badge_x + 5.0,
            52.0,
            BADGE_WIDTH - 10.0,
            theme.fonts.header,
            8.0,
            Rgb::WHITE,
        );
    }

    /// Returns the cursor below the block
    fn filters_block(&mut self, ctx: &RenderContext<'_>, mut y: f32) -> f32 {
        let lines = ctx.filters.summary_lines();
        if lines.is_empty() {
            return y;
        }

        let theme = self.theme;
        let width = self.content_width();
        self.text(
            "Filters Applied:",
            MARGIN,
            y,
            width,
            theme.fonts.header,
            12.0,
            Self::color(theme.colors.dark),
        );
        y += 20.0;
        for line in lines {
            self.text(
                &line,
                70.0,
                y,
                width - 20.0,
                theme.fonts.body,
                9.0,
                Self::color(theme.colors.secondary),
            );
            y += 15.0;
        }
        y + 10.0
    }

    fn summary_boxes(&mut self, ctx: &RenderContext<'_>, top: f32) -> f32 {
        let theme = self.theme;
        let summary = ctx.summary;
        let net = summary.net();
        let net_color = if net.is_negative() {
            theme.colors.danger
        } else {
            theme.colors.success
        };
        let money = |m: Money| m.format_with_symbol(ctx.currency);

        let box_width = (self.content_width() - 2.0 * BOX_GAP) / 3.0;
        let box_x = |i: f32| MARGIN + i * (box_width + BOX_GAP);
        let boxes = [
            (
                box_x(0.0),
                theme.colors.success,
                "TOTAL INCOME",
                money(summary.income),
                format!("{} transactions", summary.income_count),
            ),
            (
                box_x(1.0),
                theme.colors.primary,
                "TOTAL EXPENSES",
                money(summary.expenses),
                format!("{} transactions", summary.expense_count),
            ),
            (
                box_x(2.0),
                net_color,
                "NET AMOUNT",
                money(net),
                format!("{} total records", summary.count),
            ),
        ];

        let inner = box_width - 20.0;
        for (x, fill, label, amount, caption) in boxes {
            self.doc
                .fill_rect(x, top, box_width, BOX_HEIGHT, Self::color(fill));
            self.text(label, x + 10.0, top + 10.0, inner, theme.fonts.header, 10.0, Rgb::WHITE);
            self.text(&amount, x + 10.0, top + 25.0, inner, theme.fonts.header, 12.0, Rgb::WHITE);
            self.text(&caption, x + 10.0, top + 40.0, inner, theme.fonts.header, 8.0, Rgb::WHITE);
        }

        let mut y = top + BOX_HEIGHT + 20.0;
        let sign = if net.is_negative() { "" } else { "+" };
        self.text(
            &format!("Net Amount: {}{}", sign, money(net)),
            MARGIN,
            y,
            self.content_width(),
            theme.fonts.header,
            11.0,
            Self::color(net_color),
        );
        y += 20.0;
        y
    }

    fn table_header(&mut self, y: f32) {
        let theme = self.theme;
        let mut x = MARGIN;
        for (title, width, align) in self.columns() {
            self.doc.text(
                title,
                x,
                y,
                width,
                (theme.fonts.header, 10.0, Self::color(theme.colors.primary)),
                align,
            );
            x += width;
        }
    }

    fn table(&mut self, ctx: &RenderContext<'_>, top: f32) -> TallyResult<()> {
        let theme = self.theme;
        let shade = Self::color(SHADE);
        let secondary = Self::color(theme.colors.secondary);
        let columns = self.columns();
        let content_width = self.content_width();

        self.table_header(top);
        let mut y = top + ROW_HEIGHT;

        for (index, row) in ctx.transactions.iter().enumerate() {
            ctx.cancel.check()?;
            let category = joined_category(row)?;
            let txn = &row.transaction;

            if y > self.doc.height() - BOTTOM_RESERVE {
                self.doc.add_page();
                y = MARGIN;
                self.table_header(y);
                y += ROW_HEIGHT;
            }

            if index % 2 == 0 {
                self.doc
                    .fill_rect(MARGIN, y - 5.0, content_width, ROW_HEIGHT, shade);
            }

            let kind_color = Self::color(match txn.kind {
                TransactionKind::Income => theme.colors.success,
                TransactionKind::Expense => theme.colors.danger,
            });
            let date = txn.date.format("%b %-d, %y").to_string();
            let amount = txn.amount.format_with_symbol(ctx.currency);
            let cells: [(&str, Font, Rgb); 5] = [
                (&date, theme.fonts.body, secondary),
                (&txn.description, theme.fonts.body, secondary),
                (&category.name, theme.fonts.body, secondary),
                (txn.kind.label(), theme.fonts.body, kind_color),
                (&amount, theme.fonts.mono, kind_color),
            ];

            let mut x = MARGIN;
            for ((text, font, color), (_, width, align)) in cells.into_iter().zip(columns) {
                self.doc.text(text, x, y, width, (font, 9.0, color), align);
                x += width;
            }

            y += ROW_HEIGHT;
        }

        Ok(())
    }
}

impl ReportRenderer for PdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, ctx: &RenderContext<'_>) -> TallyResult<Vec<u8>> {
        let theme = &ctx.options.theme;
        let info = DocumentInfo {
            title: format!("Expense Report - {} Theme", theme.name.display_name()),
            author: "Tallybook".to_string(),
            subject: "Financial Export".to_string(),
            created_at: ctx.generated_at,
        };

        let mut layout = Layout {
            doc: PdfDocument::new(ctx.options.paper, info),
            theme,
        };

        layout.header_block(ctx);
        let y = layout.filters_block(ctx, 110.0);
        let y = layout.summary_boxes(ctx, y);
        layout.table(ctx, y)?;

        Ok(layout.doc.finish())
    }
}
