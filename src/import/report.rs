// src/import/report.rs
use crate::import::{classifier::RecordSchema, decoder::RawRow};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The row could not be decoded into a record at all.
    Malformed,
    /// A field failed a structural or referential rule.
    Invalid,
    /// The store refused the row on a uniqueness constraint.
    Duplicate,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::Malformed => "malformed",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Duplicate => "duplicate",
        })
    }
}

/// Why one row could not be imported, keyed by its line in the uploaded file.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub line: u64,
    pub kind: ErrorKind,
    pub message: String,
    pub row: RawRow,
}

/// A rule failure before it is attached to the row that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub kind: ErrorKind,
    pub message: String,
}

impl Rejection {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Invalid,
            message: message.into(),
        }
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Duplicate,
            message: message.into(),
        }
    }

    pub fn at(self, row: &RawRow) -> ValidationError {
        ValidationError {
            line: row.line(),
            kind: self.kind,
            message: self.message,
            row: row.clone(),
        }
    }
}

/// Outcome of a single row check: the typed record or the reason it was refused.
pub type Checked<T> = Result<T, Rejection>;

#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub record_type: RecordSchema,
    pub success: bool,
    pub inserted: u64,
    pub errors: Vec<ValidationError>,
}

impl ImportResult {
    pub fn new(record_type: RecordSchema, inserted: u64, errors: Vec<ValidationError>) -> Self {
        Self {
            record_type,
            success: errors.is_empty(),
            inserted,
            errors,
        }
    }

    pub fn summary(&self) -> String {
        match (self.success, self.errors.len()) {
            (true, _) => format!("{} {} row(s) imported", self.inserted, self.record_type),
            (false, 1) => format!("1 error detected, {} row(s) imported", self.inserted),
            (false, n) => format!("{} errors detected, {} row(s) imported", n, self.inserted),
        }
    }
}
