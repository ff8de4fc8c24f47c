// src/import/validator.rs
use crate::{
    config::ImportConfig,
    import::{
        error::StoreError,
        gateway::StoreGateway,
        normalizer::{AccountFields, ClassFields, GradeFields},
        report::{Checked, Rejection},
    },
    models::user::Role,
};
use chrono::NaiveDate;
use std::str::FromStr;

// --- Records ready for the store ---

#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub class_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassRecord {
    pub name: String,
    pub level: String,
    pub academic_year: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradeRecord {
    pub student_id: i64,
    pub subject_id: i64,
    pub grade: f64,
    pub comments: String,
    pub evaluation_date: NaiveDate,
}

/// An account row that passed every check and only waits for its password
/// to be hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidAccount {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub nom: String,
    pub prenom: String,
    pub email: String,
    pub class_id: Option<i64>,
}

impl ValidAccount {
    pub fn into_record(self, password_hash: String) -> AccountRecord {
        AccountRecord {
            username: self.username,
            password_hash,
            role: self.role,
            nom: self.nom,
            prenom: self.prenom,
            email: self.email,
            class_id: self.class_id,
        }
    }
}

pub fn validate_account(fields: AccountFields, config: &ImportConfig) -> Checked<ValidAccount> {
    let missing: Vec<&str> = [
        ("username", &fields.username),
        ("password", &fields.password),
        ("role", &fields.role),
        ("nom", &fields.nom),
        ("prenom", &fields.prenom),
        ("email", &fields.email),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();
    if !missing.is_empty() {
        return Err(Rejection::invalid(format!("missing fields: {}", missing.join(", "))));
    }

    if !config.allowed_roles.contains(&fields.role) {
        return Err(Rejection::invalid(format!("unknown role '{}'", fields.role)));
    }
    let role = Role::from_str(&fields.role).map_err(Rejection::invalid)?;

    let class_id = match fields.class_id {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| Rejection::invalid(format!("invalid class reference '{raw}'")))?,
        ),
        None => None,
    };

    Ok(ValidAccount {
        username: fields.username,
        password: fields.password,
        role,
        nom: fields.nom,
        prenom: fields.prenom,
        email: fields.email,
        class_id,
    })
}

pub fn validate_class(fields: ClassFields) -> Checked<ClassRecord> {
    let missing: Vec<&str> = [
        ("name", &fields.name),
        ("level", &fields.level),
        ("academic_year", &fields.academic_year),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(name, _)| name)
    .collect();
    if !missing.is_empty() {
        return Err(Rejection::invalid(format!("missing fields: {}", missing.join(", "))));
    }

    Ok(ClassRecord {
        name: fields.name,
        level: fields.level,
        academic_year: fields.academic_year,
    })
}

/// Checks a grade row in a fixed order and stops at the first failure:
/// the value itself, then the student, then the teacher's own subject.
///
/// The outer `Result` carries store failures, which abort the import; the
/// inner one is the verdict on this row.
pub async fn validate_grade<G>(
    fields: GradeFields,
    teacher_id: i64,
    gateway: &mut G,
    config: &ImportConfig,
    evaluation_date: NaiveDate,
) -> Result<Checked<GradeRecord>, StoreError>
where
    G: StoreGateway + ?Sized,
{
    let grade = match parse_grade(&fields.grade, config) {
        Ok(grade) => grade,
        Err(rejection) => return Ok(Err(rejection)),
    };

    let Some(student_id) = gateway.find_student_by_email(&fields.student_email).await? else {
        return Ok(Err(Rejection::invalid("student not found")));
    };

    // A subject taught by someone else is reported exactly like a missing one
    let Some(subject_id) = gateway
        .find_subject_for_teacher(&fields.subject_name, teacher_id)
        .await?
    else {
        return Ok(Err(Rejection::invalid("subject not assigned to teacher")));
    };

    Ok(Ok(GradeRecord {
        student_id,
        subject_id,
        grade,
        comments: truncate_chars(&fields.comments, config.max_comment_chars),
        evaluation_date,
    }))
}

fn parse_grade(raw: &str, config: &ImportConfig) -> Checked<f64> {
    let invalid = || {
        Rejection::invalid(format!(
            "invalid grade '{}': expected a number between {} and {}",
            raw.trim(),
            config.min_grade,
            config.max_grade
        ))
    };
    let grade: f64 = raw.trim().parse().map_err(|_| invalid())?;
    if grade.is_finite() && (config.min_grade..=config.max_grade).contains(&grade) {
        Ok(grade)
    } else {
        Err(invalid())
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => value[..cut].to_string(),
        None => value.to_string(),
    }
}
