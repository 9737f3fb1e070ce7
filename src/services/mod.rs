//! Service layer for Tallybook
//!
//! Services sit between callers (the CLI, or an HTTP layer) and the engine.
//! They resolve settings, pick renderers and package results.

pub mod export;

pub use export::ExportService;
