//! CLI commands for report export

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::display::{format_artifact_summary, format_theme_list};
use crate::error::{TallyError, TallyResult};
use crate::export::{available_themes, ExportFilters, ExportOptions};
use crate::models::UserId;
use crate::services::ExportService;
use crate::storage::EntityStore;

#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Export format: csv, xlsx, pdf, json or financial-report
    #[arg(short, long, default_value = "csv")]
    pub format: String,

    /// Start date (YYYY-MM-DD or RFC 3339)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD or RFC 3339), inclusive
    #[arg(long)]
    pub end: Option<String>,

    /// Only income or expense transactions
    #[arg(short = 't', long = "type")]
    pub kind: Option<String>,

    /// Only this category (id)
    #[arg(short, long)]
    pub category: Option<String>,

    /// Case-insensitive description search
    #[arg(short, long)]
    pub search: Option<String>,

    /// Theme preset (default, professional, modern, minimal)
    #[arg(long)]
    pub theme: Option<String>,

    /// Leave the summary section out
    #[arg(long)]
    pub no_summary: bool,

    /// PDF paper size (A3, A4, A5, Letter, Legal)
    #[arg(long)]
    pub paper_size: Option<String>,

    /// Financial report period (week, month, quarter, year)
    #[arg(long)]
    pub period: Option<String>,

    /// Directory the file is written to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,
}

impl ExportArgs {
    fn filters(&self) -> ExportFilters {
        ExportFilters {
            kind: self.kind.clone(),
            category: self.category.clone(),
            start_date: self.start.clone(),
            end_date: self.end.clone(),
            search: self.search.clone(),
        }
    }

    fn options(&self) -> ExportOptions {
        ExportOptions {
            theme: self.theme.clone(),
            include_summary: !self.no_summary,
            paper_size: self.paper_size.clone(),
            period: self.period.clone(),
        }
    }
}

/// Handle the export command
pub fn handle_export_command(
    store: &dyn EntityStore,
    settings: &Settings,
    user_id: UserId,
    args: ExportArgs,
) -> TallyResult<()> {
    let artifact = ExportService::new(store, settings).export_named(
        user_id,
        &args.format,
        &args.filters(),
        &args.options(),
    )?;

    fs::create_dir_all(&args.output).map_err(|e| {
        TallyError::Io(format!(
            "Failed to create directory {}: {}",
            args.output.display(),
            e
        ))
    })?;
    let path = args.output.join(&artifact.filename);
    fs::write(&path, &artifact.bytes)
        .map_err(|e| TallyError::Io(format!("Failed to write {}: {}", path.display(), e)))?;

    print!("{}", format_artifact_summary(&artifact, &path));
    Ok(())
}

/// Handle the themes command
pub fn handle_themes_command(json: bool) -> TallyResult<()> {
    let themes = available_themes();
    if json {
        println!("{}", serde_json::to_string_pretty(&themes)?);
    } else {
        print!("{}", format_theme_list(&themes));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;
    use tempfile::TempDir;

    #[test]
    fn test_export_writes_named_file() {
        let fx = Fixture::with_january();
        let settings = Settings::default();
        let out = TempDir::new().unwrap();
        let args = ExportArgs {
            format: "json".into(),
            theme: Some("modern".into()),
            output: out.path().join("reports"),
            ..ExportArgs::default()
        };

        handle_export_command(&fx.storage, &settings, fx.user, args).unwrap();

        let files: Vec<_> = fs::read_dir(out.path().join("reports"))
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(files.len(), 1);
        assert!(files[0].starts_with("expenses-data-all-modern-"));
        assert!(files[0].ends_with(".json"));
    }

    #[test]
    fn test_options_from_args() {
        let args = ExportArgs {
            no_summary: true,
            paper_size: Some("letter".into()),
            ..ExportArgs::default()
        };
        let options = args.options();
        assert!(!options.include_summary);
        assert_eq!(options.paper_size.as_deref(), Some("letter"));
        assert!(args.filters().is_empty());
    }
}
