//! Schema error types

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Schema errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("invalid table filter '{pattern}': {reason}")]
    InvalidTableFilter { pattern: String, reason: String },
}

impl SchemaError {
    pub fn invalid_table_filter(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTableFilter {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}
