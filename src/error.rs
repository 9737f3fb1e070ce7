//! Custom error types for Tallybook
//!
//! Every failure the statistics and export engine can report is a variant of
//! [`TallyError`]. Callers (the CLI, or an HTTP layer) match on the variant to
//! decide how to present it; nothing in the engine retries on its own.

use thiserror::Error;

/// Boxed cause attached to store failures
pub type StoreCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for Tallybook operations
#[derive(Error, Debug)]
pub enum TallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed filter or option values
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found, or not owned by the requesting user
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Uniqueness constraint violated in the store
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// Requested export format is not implemented
    #[error("Unsupported export format '{requested}' (supported: {})", supported.join(", "))]
    UnsupportedFormat {
        requested: String,
        supported: Vec<&'static str>,
    },

    /// The entity store failed
    #[error("Storage error: {message}")]
    Store {
        message: String,
        #[source]
        source: Option<StoreCause>,
    },

    /// Data could not be serialized into the requested format
    #[error("Render error: {0}")]
    Render(String),

    /// The caller abandoned the request
    #[error("Export cancelled")]
    Cancelled,
}

impl TallyError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Create a store error without an underlying cause
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a store error carrying its cause
    pub fn store_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Store {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is a store constraint violation
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Check if the request was rejected because of its input
    ///
    /// These map to a 4xx-style outcome at an HTTP boundary.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::NotFound { .. }
                | Self::Duplicate { .. }
                | Self::UnsupportedFormat { .. }
        )
    }
}

impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Tallybook operations
pub type TallyResult<T> = Result<T, TallyError>;
