//! User settings for Tallybook
//!
//! Report presentation defaults and export limits, persisted as JSON next to
//! the data directory.

use serde::{Deserialize, Serialize};

use super::paths::TallyPaths;
use crate::error::TallyError;

/// User settings for Tallybook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency symbol used in formatted amounts (a label only)
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,

    /// Theme used when an export does not name one
    #[serde(default = "default_theme")]
    pub default_theme: String,

    /// Paper size used when a PDF export does not name one
    #[serde(default = "default_paper_size")]
    pub default_paper_size: String,

    /// Exports matching more transactions than this are rejected
    #[serde(default = "default_max_export_rows")]
    pub max_export_rows: usize,

    /// Log filter level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_first_day_of_week() -> u8 {
    0 // Sunday
}

fn default_theme() -> String {
    "default".to_string()
}

fn default_paper_size() -> String {
    "A4".to_string()
}

fn default_max_export_rows() -> usize {
    50_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_symbol: default_currency(),
            first_day_of_week: default_first_day_of_week(),
            default_theme: default_theme(),
            default_paper_size: default_paper_size(),
            max_export_rows: default_max_export_rows(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or fall back to defaults if the file doesn't exist
    pub fn load_or_create(paths: &TallyPaths) -> Result<Self, TallyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| TallyError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                TallyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.validate()?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &TallyPaths) -> Result<(), TallyError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| TallyError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| TallyError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), TallyError> {
        if self.first_day_of_week > 6 {
            return Err(TallyError::Config(format!(
                "first_day_of_week must be 0-6, got {}",
                self.first_day_of_week
            )));
        }
        if self.max_export_rows == 0 {
            return Err(TallyError::Config(
                "max_export_rows must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
