//! Core data models for Tallybook
//!
//! Entities owned by the store (transactions, categories, budgets) plus the
//! value types the engine computes with (money, date windows, periods).

pub mod budget;
pub mod category;
pub mod ids;
pub mod money;
pub mod period;
pub mod range;
pub mod transaction;

pub use budget::Budget;
pub use category::Category;
pub use ids::{BudgetId, CategoryId, TransactionId, UserId};
pub use money::Money;
pub use period::ReportPeriod;
pub use range::{DateRange, StatsPeriod};
pub use transaction::{Transaction, TransactionKind};
