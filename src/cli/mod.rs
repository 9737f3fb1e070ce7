//! CLI command handlers
//!
//! Bridges clap argument parsing with the reports and the export service.

pub mod export;
pub mod stats;

pub use export::{handle_export_command, handle_themes_command, ExportArgs};
pub use stats::{handle_budgets_command, handle_stats_command, BudgetsArgs, StatsArgs};

use crate::error::{TallyError, TallyResult};
use crate::models::UserId;

/// Parse the `--user` value
pub fn parse_user(raw: &str) -> TallyResult<UserId> {
    raw.parse()
        .map_err(|e| TallyError::Validation(format!("Invalid user id '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user() {
        let user = UserId::new();
        assert_eq!(parse_user(&user.to_string()).unwrap(), user);
        assert!(parse_user("bob").unwrap_err().is_validation());
    }
}
