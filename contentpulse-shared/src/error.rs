//! Error taxonomy shared by every ContentPulse operation.
//!
//! Each failure lands in one of four buckets that callers handle differently:
//!
//! - [`PlanError::Validation`]: the caller sent something unusable; fix and retry.
//! - [`PlanError::NotFound`]: the tenant or item does not exist for this caller.
//! - [`PlanError::Persistence`]: the store rejected or lost the write; the whole
//!   batch was rolled back.
//! - [`PlanError::ExternalService`]: the text-generation provider failed or sent
//!   output that does not fit the expected shape. Nothing is retried.
//!
//! None of these are fatal to the process and none leave partial writes behind.

use serde::Serialize;
use sqlx::error::ErrorKind;
use std::fmt;
use uuid::Uuid;

/// Identifies the grid row that triggered a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RowRef {
    /// Zero-based position in the submitted working set
    Position(usize),
    /// Persisted identifier (rows marked for removal have no position)
    Item(Uuid),
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowRef::Position(index) => write!(f, "row {}", index + 1),
            RowRef::Item(id) => write!(f, "item {}", id),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("{}", with_row(.row, .message))]
    Validation {
        row: Option<RowRef>,
        message: String,
    },

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{}", with_row(.row, .source))]
    Persistence {
        row: Option<RowRef>,
        #[source]
        source: sqlx::Error,
    },

    #[error("external service failure: {0}")]
    ExternalService(String),
}

fn with_row(row: &Option<RowRef>, message: &dyn fmt::Display) -> String {
    match row {
        Some(row) => format!("{}: {}", row, message),
        None => message.to_string(),
    }
}

impl PlanError {
    pub fn validation(message: impl Into<String>) -> Self {
        PlanError::Validation {
            row: None,
            message: message.into(),
        }
    }

    pub fn invalid_row(row: RowRef, message: impl Into<String>) -> Self {
        PlanError::Validation {
            row: Some(row),
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str) -> Self {
        PlanError::NotFound { entity }
    }

    pub fn persistence_at(row: RowRef, source: sqlx::Error) -> Self {
        PlanError::Persistence {
            row: Some(row),
            source,
        }
    }

    /// The row that triggered the failure, when one is known.
    pub fn row(&self) -> Option<RowRef> {
        match self {
            PlanError::Validation { row, .. } | PlanError::Persistence { row, .. } => *row,
            _ => None,
        }
    }

    /// True for unique, foreign-key, not-null and check violations.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            PlanError::Persistence { source, .. } => source
                .as_database_error()
                .map(|db| !matches!(db.kind(), ErrorKind::Other))
                .unwrap_or(false),
            _ => false,
        }
    }
}

impl From<sqlx::Error> for PlanError {
    fn from(source: sqlx::Error) -> Self {
        PlanError::Persistence { row: None, source }
    }
}

pub type PlanResult<T> = Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_ref_display_is_one_based() {
        assert_eq!(RowRef::Position(0).to_string(), "row 1");
        assert_eq!(RowRef::Position(4).to_string(), "row 5");
    }

    #[test]
    fn test_validation_message_names_row() {
        let err = PlanError::invalid_row(RowRef::Position(2), "title is required");
        assert_eq!(err.to_string(), "row 3: title is required");
        assert_eq!(err.row(), Some(RowRef::Position(2)));
    }

    #[test]
    fn test_persistence_keeps_row() {
        let err = PlanError::persistence_at(RowRef::Position(1), sqlx::Error::RowNotFound);
        assert_eq!(err.row(), Some(RowRef::Position(1)));
        assert!(err.to_string().starts_with("row 2: "));
        assert!(!err.is_constraint_violation());
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(PlanError::not_found("company").to_string(), "company not found");
    }
}
