//! Category model
//!
//! Categories are per-user labels with a kind. Transactions and budgets
//! point at them; reports join their name and color in for presentation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, UserId};
use super::transaction::TransactionKind;

/// Maximum category name length accepted by the store
pub const MAX_CATEGORY_NAME_LEN: usize = 30;

fn default_color() -> String {
    "#6B7280".to_string()
}

fn default_icon() -> String {
    "receipt".to_string()
}

/// A user-defined category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,

    /// Owner of the category
    pub user_id: UserId,

    /// Name, unique per user
    pub name: String,

    pub kind: TransactionKind,

    /// Display color as a `#RRGGBB` hex string
    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_icon")]
    pub icon: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category with the default color and icon
    pub fn new(user_id: UserId, name: impl Into<String>, kind: TransactionKind) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            user_id,
            name: name.into(),
            kind,
            color: default_color(),
            icon: default_icon(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Builder-style color assignment
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.name.trim().is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }

        let len = self.name.chars().count();
        if len > MAX_CATEGORY_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }

        if !is_hex_color(&self.color) {
            return Err(CategoryValidationError::InvalidColor(self.color.clone()));
        }

        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
    InvalidColor(String),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Category name too long ({} chars, max {})",
                len, MAX_CATEGORY_NAME_LEN
            ),
            Self::InvalidColor(color) => write!(f, "Invalid category color '{}'", color),
        }
    }
}

impl std::error::Error for CategoryValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_category_defaults() {
        let category = Category::new(UserId::new(), "Food", TransactionKind::Expense);
        assert_eq!(category.color, "#6B7280");
        assert_eq!(category.icon, "receipt");
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_category_validation() {
        let mut category = Category::new(UserId::new(), "", TransactionKind::Income);
        assert_eq!(category.validate(), Err(CategoryValidationError::EmptyName));

        category.name = "a".repeat(31);
        assert_eq!(
            category.validate(),
            Err(CategoryValidationError::NameTooLong(31))
        );

        category.name = "Salary".into();
        category.color = "green".into();
        assert!(matches!(
            category.validate(),
            Err(CategoryValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_missing_optional_fields_deserialize() {
        let category = Category::new(UserId::new(), "Rent", TransactionKind::Expense);
        let mut value = serde_json::to_value(&category).unwrap();
        let object = value.as_object_mut().unwrap();
        object.remove("color");
        object.remove("icon");

        let back: Category = serde_json::from_value(value).unwrap();
        assert_eq!(back.color, "#6B7280");
        assert_eq!(back.icon, "receipt");
    }
}
