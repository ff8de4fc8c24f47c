// src/import/error.rs
use thiserror::Error;

/// Failures that abort a whole import. Row-level problems never end up here;
/// they are collected in the `ImportResult` instead.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("unreadable payload: {0}")]
    Unreadable(String),

    #[error("unrecognized format: headers [{}] match no known record type", .headers.join(", "))]
    UnrecognizedFormat { headers: Vec<String> },

    #[error("missing headers: {}", .missing.join(", "))]
    MissingHeaders { missing: Vec<String> },

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),
}

impl ImportError {
    /// Errors caused by the uploaded file itself rather than the system.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            ImportError::Unreadable(_)
                | ImportError::UnrecognizedFormat { .. }
                | ImportError::MissingHeaders { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("duplicate key: {0}")]
    Duplicate(String),

    #[error("foreign key violation: {0}")]
    ForeignKey(String),

    #[error("transaction already closed")]
    Closed,

    #[error(transparent)]
    Database(sqlx::Error),
}

// Constraint violations are sorted out here so callers can match on them
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKey(db_err.message().to_string());
            }
        }
        StoreError::Database(err)
    }
}
