//! Transaction model
//!
//! A transaction is a single income or expense record. Amounts are always
//! non-negative; the kind decides which side of the ledger they land on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::{CategoryId, TransactionId, UserId};
use super::money::Money;

/// Maximum description length accepted by the store
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// Whether a transaction (or category) is income or expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    /// Lowercase wire name ("income", "expense")
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Capitalized label for reports ("Income", "Expense")
    pub fn label(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(format!(
                "Invalid type '{}': expected 'income' or 'expense'",
                other
            )),
        }
    }
}

/// A financial transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Owner of the record
    pub user_id: UserId,

    /// Non-negative amount
    pub amount: Money,

    pub description: String,

    /// Must reference a category owned by `user_id`
    pub category_id: CategoryId,

    /// When the transaction happened
    pub date: DateTime<Utc>,

    pub kind: TransactionKind,

    #[serde(default)]
    pub tags: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction
    pub fn new(
        user_id: UserId,
        category_id: CategoryId,
        kind: TransactionKind,
        amount: Money,
        date: DateTime<Utc>,
        description: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            user_id,
            amount,
            description: description.into(),
            category_id,
            date,
            kind,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style tag assignment
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// Amount with the ledger sign applied (expenses negative)
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }

    /// Tags joined for display ("food, weekly")
    pub fn joined_tags(&self) -> String {
        self.tags.join(", ")
    }

    /// Case-insensitive substring match against the description
    pub fn description_matches(&self, needle: &str) -> bool {
        self.description
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }

    /// Validate the transaction
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if self.amount.is_negative() {
            return Err(TransactionValidationError::NegativeAmount);
        }

        if self.description.trim().is_empty() {
            return Err(TransactionValidationError::EmptyDescription);
        }

        let len = self.description.chars().count();
        if len > MAX_DESCRIPTION_LEN {
            return Err(TransactionValidationError::DescriptionTooLong(len));
        }

        Ok(())
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NegativeAmount,
    EmptyDescription,
    DescriptionTooLong(usize),
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Amount cannot be negative"),
            Self::EmptyDescription => write!(f, "Description cannot be empty"),
            Self::DescriptionTooLong(len) => write!(
                f,
                "Description too long ({} chars, max {})",
                len, MAX_DESCRIPTION_LEN
            ),
        }
    }
}

impl std::error::Error for TransactionValidationError {}
