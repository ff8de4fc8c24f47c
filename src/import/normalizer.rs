// src/import/normalizer.rs
//! Per-schema string clean-up applied before validation. Nothing here
//! rejects a row; values are only rewritten.

use crate::import::decoder::RawRow;

#[derive(Debug, Clone, PartialEq)]
pub struct AccountFields {
    pub username: String,
    pub password: String,
    pub role: String,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub class_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassFields {
    pub name: String,
    pub level: String,
    pub academic_year: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeFields {
    pub student_email: String,
    pub subject_name: String,
    /// Left as typed; parsing belongs to the validator.
    pub grade: String,
    pub comments: String,
}

pub fn normalize_account(row: &RawRow) -> AccountFields {
    AccountFields {
        username: row.value("username").trim().to_lowercase(),
        // Passwords are hashed exactly as given
        password: row.value("password").to_string(),
        role: row.value("role").trim().to_lowercase(),
        nom: title_case(row.value("nom").trim()),
        prenom: title_case(row.value("prenom").trim()),
        email: row.value("email").trim().to_lowercase(),
        class_id: row
            .get("class_id")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string),
    }
}

pub fn normalize_class(row: &RawRow) -> ClassFields {
    ClassFields {
        name: row.value("name").trim().to_uppercase(),
        level: title_case(row.value("level").trim()),
        academic_year: row.value("academic_year").trim().to_string(),
    }
}

pub fn normalize_grade(row: &RawRow) -> GradeFields {
    GradeFields {
        student_email: row.value("student_email").trim().to_lowercase(),
        subject_name: row.value("subject_name").trim().to_string(),
        grade: row.value("grade").to_string(),
        comments: row.value("comments").to_string(),
    }
}

/// Upper-cases the first letter of every run of letters and lower-cases the
/// rest, so "jean-PIERRE d'arc" becomes "Jean-Pierre D'Arc".
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_word = false;
    for c in value.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
