//! Configuration module for Tallybook
//!
//! - Path resolution for the data directory
//! - Settings persistence (report defaults, export limits, log level)

pub mod paths;
pub mod settings;

pub use paths::TallyPaths;
pub use settings::Settings;
