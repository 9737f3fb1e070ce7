//! Tallybook - personal finance statistics and report export
//!
//! Reads income and expense transactions, categories and monthly budgets
//! through an [`storage::EntityStore`], aggregates them into statistics and
//! renders filtered exports (CSV, PDF, JSON data, financial report).
//!
//! # Architecture
//!
//! - `config`: Path resolution and settings
//! - `error`: Custom error types
//! - `models`: Entities and value types (money, date windows, periods)
//! - `storage`: The entity store contract and a JSON-file implementation
//! - `reports`: Aggregation (category breakdown, monthly series, summaries, budgets)
//! - `export`: Renderers, themes, filters and filenames
//! - `services`: Export orchestration
//! - `cli` / `display`: Command-line boundary
//!
//! # Example
//!
//! ```rust,ignore
//! use tallybook::config::{TallyPaths, Settings};
//! use tallybook::export::{ExportFilters, ExportFormat, ExportOptions};
//! use tallybook::services::ExportService;
//! use tallybook::storage::Storage;
//!
//! let paths = TallyPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let artifact = ExportService::new(&storage, &settings).export(
//!     user_id,
//!     ExportFormat::Csv,
//!     &ExportFilters::default(),
//!     &ExportOptions::default(),
//! )?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

#[cfg(test)]
mod testing;

pub use error::{TallyError, TallyResult};
