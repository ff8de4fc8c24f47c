// src/templates.rs
use crate::{import::ImportResult, models::user::Role};
use askama::Template;

// Struct for `templates/login.html`
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub error: Option<String>,
}

/// Upload form plus the report of the last import, if any.
#[derive(Template)]
#[template(path = "import.html")]
pub struct ImportPage {
    pub role: Role,
    pub result: Option<ImportResult>,
    pub error: Option<String>,
}

impl ImportPage {
    /// What the file on this page is expected to contain for the caller's role.
    pub fn expected_content(&self) -> &'static str {
        match self.role {
            Role::Admin => "accounts (username, password, role, nom, prenom, email[, class_id]) or classes (name, level, academic_year)",
            Role::Teacher => "grades (student_email, subject_name, grade[, comments])",
            Role::Student => "nothing: students cannot import files",
        }
    }

    pub fn can_upload(&self) -> bool {
        self.role != Role::Student
    }
}
