//! Export service
//!
//! Orchestrates one export: validate filters and options, query the store,
//! total the filtered set, hand everything to the renderer for the requested
//! format and package the bytes with a filename, content type and metadata.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{TallyError, TallyResult};
use crate::export::financial::FinancialRequest;
use crate::export::{
    export_filename, CancelToken, CsvRenderer, DataRenderer, ExportArtifact, ExportFilters,
    ExportFormat, ExportMetadata, ExportOptions, FinancialReport, PdfRenderer, RenderContext,
    ReportRenderer, XlsxRenderer,
};
use crate::models::UserId;
use crate::reports::PeriodSummaryReport;
use crate::storage::EntityStore;

/// Service producing export artifacts
pub struct ExportService<'a> {
    store: &'a dyn EntityStore,
    settings: &'a Settings,
    cancel: CancelToken,
}

impl<'a> ExportService<'a> {
    /// Create a new export service
    pub fn new(store: &'a dyn EntityStore, settings: &'a Settings) -> Self {
        Self {
            store,
            settings,
            cancel: CancelToken::new(),
        }
    }

    /// Observe `cancel`; flipping it aborts the export in progress
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn export_csv(
        &self,
        user_id: UserId,
        filters: &ExportFilters,
        options: &ExportOptions,
    ) -> TallyResult<ExportArtifact> {
        self.export(user_id, ExportFormat::Csv, filters, options)
    }

    pub fn export_xlsx(
        &self,
        user_id: UserId,
        filters: &ExportFilters,
        options: &ExportOptions,
    ) -> TallyResult<ExportArtifact> {
        self.export(user_id, ExportFormat::Xlsx, filters, options)
    }

    pub fn export_pdf(
        &self,
        user_id: UserId,
        filters: &ExportFilters,
        options: &ExportOptions,
    ) -> TallyResult<ExportArtifact> {
        self.export(user_id, ExportFormat::Pdf, filters, options)
    }

    pub fn export_json(
        &self,
        user_id: UserId,
        filters: &ExportFilters,
        options: &ExportOptions,
    ) -> TallyResult<ExportArtifact> {
        self.export(user_id, ExportFormat::Json, filters, options)
    }

    /// Financial report for `options.period`; date filters do not apply
    pub fn export_financial_report(
        &self,
        user_id: UserId,
        options: &ExportOptions,
    ) -> TallyResult<ExportArtifact> {
        self.export(
            user_id,
            ExportFormat::FinancialReport,
            &ExportFilters::default(),
            options,
        )
    }

    /// Export by format name, as received from a caller
    pub fn export_named(
        &self,
        user_id: UserId,
        format: &str,
        filters: &ExportFilters,
        options: &ExportOptions,
    ) -> TallyResult<ExportArtifact> {
        let format: ExportFormat = format.parse()?;
        self.export(user_id, format, filters, options)
    }

    pub fn export(
        &self,
        user_id: UserId,
        format: ExportFormat,
        filters: &ExportFilters,
        options: &ExportOptions,
    ) -> TallyResult<ExportArtifact> {
        self.export_at(user_id, format, filters, options, Utc::now())
    }

    /// Export with an explicit clock for the period, filename and timestamps
    pub fn export_at(
        &self,
        user_id: UserId,
        format: ExportFormat,
        filters: &ExportFilters,
        options: &ExportOptions,
        now: DateTime<Utc>,
    ) -> TallyResult<ExportArtifact> {
        debug!(%user_id, %format, "Starting export");

        let result = match format {
            ExportFormat::Csv => self.render_rows(&CsvRenderer, user_id, filters, options, now),
            ExportFormat::Xlsx => self.render_rows(&XlsxRenderer, user_id, filters, options, now),
            ExportFormat::Pdf => self.render_rows(&PdfRenderer, user_id, filters, options, now),
            ExportFormat::Json => self.render_rows(&DataRenderer, user_id, filters, options, now),
            ExportFormat::FinancialReport => self.render_financial(user_id, options, now),
        };

        match &result {
            Ok(artifact) => info!(
                %format,
                rows = artifact.metadata.record_count,
                bytes = artifact.bytes.len(),
                filename = %artifact.filename,
                "Export finished"
            ),
            Err(TallyError::Cancelled) => info!(%format, "Export cancelled"),
            Err(e @ TallyError::Store { .. }) => warn!(%format, error = %e, "Export failed in store"),
            Err(e) => debug!(%format, error = %e, "Export rejected"),
        }

        result
    }

    fn render_rows(
        &self,
        renderer: &dyn ReportRenderer,
        user_id: UserId,
        filters: &ExportFilters,
        options: &ExportOptions,
        now: DateTime<Utc>,
    ) -> TallyResult<ExportArtifact> {
        let format = renderer.format();
        let options = options.resolve(self.settings)?;
        let applied = filters.normalize(self.store, user_id)?;

        self.cancel.check()?;
        let rows = self.store.find_transactions(user_id, &applied.query())?;
        if rows.len() > self.settings.max_export_rows {
            return Err(TallyError::Validation(format!(
                "Export matches {} transactions, more than the limit of {}; narrow the filters",
                rows.len(),
                self.settings.max_export_rows
            )));
        }

        let summary = PeriodSummaryReport::from_transactions(
            applied.range,
            rows.iter().map(|r| &r.transaction),
        );
        let ctx = RenderContext {
            transactions: &rows,
            summary: &summary,
            filters: &applied,
            options: &options,
            currency: &self.settings.currency_symbol,
            generated_at: now,
            cancel: &self.cancel,
        };
        let bytes = renderer.render(&ctx)?;

        let period = applied.period_label();
        Ok(ExportArtifact {
            filename: export_filename(format, period, options.theme.name, now),
            content_type: format.content_type(),
            metadata: ExportMetadata {
                export_type: format.export_type(),
                theme: options.theme.name,
                paper_size: (format == ExportFormat::Pdf).then_some(options.paper.name),
                period: period.to_string(),
                record_count: rows.len(),
                export_date: now,
                filters: (!applied.is_empty()).then(|| applied.clone()),
            },
            bytes,
        })
    }

    fn render_financial(
        &self,
        user_id: UserId,
        options: &ExportOptions,
        now: DateTime<Utc>,
    ) -> TallyResult<ExportArtifact> {
        let format = ExportFormat::FinancialReport;
        let options = options.resolve(self.settings)?;

        let request = FinancialRequest {
            user_id,
            period: options.period,
            first_day_of_week: self.settings.first_day_of_week,
            theme: options.theme.name,
            currency: &self.settings.currency_symbol,
            now,
        };
        let report = FinancialReport::generate(self.store, &request, &self.cancel)?;
        let bytes = report.to_json()?;

        let period = options.period.as_str();
        Ok(ExportArtifact {
            filename: export_filename(format, period, options.theme.name, now),
            content_type: format.content_type(),
            metadata: ExportMetadata {
                export_type: format.export_type(),
                theme: options.theme.name,
                paper_size: None,
                period: period.to_string(),
                record_count: report.transaction_count(),
                export_date: now,
                filters: None,
            },
            bytes,
        })
    }
}
