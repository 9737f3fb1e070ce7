//! Export result and theme listing output

use std::path::Path;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::export::{ExportArtifact, ThemeInfo};

/// What was written, and where
pub fn format_artifact_summary(artifact: &ExportArtifact, path: &Path) -> String {
    let meta = &artifact.metadata;
    let mut output = format!(
        "Exported {} transactions to: {}\n",
        meta.record_count,
        path.display()
    );
    output.push_str(&format!("  Type:    {}\n", meta.export_type));
    output.push_str(&format!("  Theme:   {}\n", meta.theme));
    if let Some(paper) = meta.paper_size {
        output.push_str(&format!("  Paper:   {}\n", paper));
    }
    output.push_str(&format!("  Period:  {}\n", meta.period));
    output.push_str(&format!(
        "  Size:    {} bytes ({})\n",
        artifact.bytes.len(),
        artifact.content_type
    ));
    output
}

#[derive(Tabled)]
struct ThemeRow {
    #[tabled(rename = "Theme")]
    name: &'static str,
    #[tabled(rename = "Name")]
    display_name: String,
    #[tabled(rename = "Primary")]
    primary: &'static str,
    #[tabled(rename = "Success")]
    success: &'static str,
    #[tabled(rename = "Danger")]
    danger: &'static str,
}

pub fn format_theme_list(themes: &[ThemeInfo]) -> String {
    let rows = themes.iter().map(|t| ThemeRow {
        name: t.name,
        display_name: t.display_name.clone(),
        primary: t.colors.primary,
        success: t.colors.success,
        danger: t.colors.danger,
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::available_themes;

    #[test]
    fn test_theme_list_names_every_theme() {
        let text = format_theme_list(&available_themes());
        for name in ["default", "professional", "modern", "minimal"] {
            assert!(text.contains(name), "missing {}", name);
        }
    }
}
