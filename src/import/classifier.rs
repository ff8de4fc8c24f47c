// src/import/classifier.rs
use crate::{config::ImportConfig, import::error::ImportError};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSchema {
    Account,
    Class,
    Grade,
}

impl RecordSchema {
    pub fn required_fields(self, config: &ImportConfig) -> &[String] {
        match self {
            RecordSchema::Account => &config.account_fields,
            RecordSchema::Class => &config.class_fields,
            RecordSchema::Grade => &config.grade_fields,
        }
    }
}

impl fmt::Display for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordSchema::Account => "account",
            RecordSchema::Class => "class",
            RecordSchema::Grade => "grade",
        })
    }
}

/// Record kinds an admin upload may contain. Grades go through their own
/// entry point because they need the uploading teacher's identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericSchema {
    Account,
    Class,
}

impl From<GenericSchema> for RecordSchema {
    fn from(schema: GenericSchema) -> Self {
        match schema {
            GenericSchema::Account => RecordSchema::Account,
            GenericSchema::Class => RecordSchema::Class,
        }
    }
}

// Tried in this order; the first schema whose fields are all present wins
const GENERIC_PRECEDENCE: [GenericSchema; 2] = [GenericSchema::Account, GenericSchema::Class];

/// Picks the schema of an admin upload from its lower-cased headers.
pub fn classify_generic(keys: &[String], config: &ImportConfig) -> Result<GenericSchema, ImportError> {
    GENERIC_PRECEDENCE
        .into_iter()
        .find(|schema| missing_fields(RecordSchema::from(*schema), keys, config).is_empty())
        .ok_or_else(|| ImportError::UnrecognizedFormat {
            headers: keys.to_vec(),
        })
}

/// Checks that a teacher upload carries every grade column.
pub fn require_grade_headers(keys: &[String], config: &ImportConfig) -> Result<(), ImportError> {
    let missing = missing_fields(RecordSchema::Grade, keys, config);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingHeaders { missing })
    }
}

fn missing_fields(schema: RecordSchema, keys: &[String], config: &ImportConfig) -> Vec<String> {
    schema
        .required_fields(config)
        .iter()
        .filter(|field| !keys.contains(*field))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn account_headers_are_recognized() {
        let config = ImportConfig::default();
        let headers = keys(&["username", "password", "role", "nom", "prenom", "email", "class_id"]);
        assert_eq!(classify_generic(&headers, &config).unwrap(), GenericSchema::Account);
    }

    #[test]
    fn class_headers_are_recognized_in_any_order() {
        let config = ImportConfig::default();
        let headers = keys(&["academic_year", "name", "level"]);
        assert_eq!(classify_generic(&headers, &config).unwrap(), GenericSchema::Class);
    }

    #[test]
    fn account_wins_when_both_schemas_match() {
        let config = ImportConfig::default();
        let headers = keys(&[
            "username", "password", "role", "nom", "prenom", "email", "name", "level", "academic_year",
        ]);
        assert_eq!(classify_generic(&headers, &config).unwrap(), GenericSchema::Account);
    }

    #[test]
    fn unknown_headers_are_a_format_error() {
        let config = ImportConfig::default();
        let err = classify_generic(&keys(&["foo", "bar"]), &config).unwrap_err();
        assert!(matches!(err, ImportError::UnrecognizedFormat { .. }));
        assert!(err.is_format_error());
    }

    #[test]
    fn grade_headers_go_through_their_own_check() {
        let config = ImportConfig::default();
        let grade = keys(&["student_email", "subject_name", "grade", "comments"]);
        assert!(require_grade_headers(&grade, &config).is_ok());
        assert!(classify_generic(&grade, &config).is_err());

        let err = require_grade_headers(&keys(&["student_email", "grade"]), &config).unwrap_err();
        match err {
            ImportError::MissingHeaders { missing } => {
                assert_eq!(missing, vec!["subject_name", "comments"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
