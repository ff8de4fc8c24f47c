// src/config.rs
use crate::error::{AppError, AppResult};
use std::{env, net::SocketAddr};

/// Rules shared by the import classifier and validators.
/// Built once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub account_fields: Vec<String>,
    pub class_fields: Vec<String>,
    pub grade_fields: Vec<String>,
    pub min_grade: f64,
    pub max_grade: f64,
    pub max_comment_chars: usize,
    pub allowed_roles: Vec<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let owned = |fields: &[&str]| fields.iter().map(|f| f.to_string()).collect();
        Self {
            account_fields: owned(&["username", "password", "role", "nom", "prenom", "email"]),
            class_fields: owned(&["name", "level", "academic_year"]),
            grade_fields: owned(&["student_email", "subject_name", "grade", "comments"]),
            min_grade: 0.0,
            max_grade: 20.0,
            max_comment_chars: 255,
            allowed_roles: owned(&["admin", "teacher", "student"]),
        }
    }
}

// Process configuration, read from the environment (.env included)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session_secret: String,
    pub bind_addr: SocketAddr,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;
        let session_secret = env::var("SESSION_SECRET")?;

        let bind_addr = match env::var("BIND_ADDR") {
            Ok(raw) => raw.parse::<SocketAddr>().map_err(|e| {
                tracing::error!("Invalid BIND_ADDR '{}': {}", raw, e);
                AppError::Config(format!("invalid BIND_ADDR: {raw}"))
            })?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 8000)),
        };

        let bcrypt_cost = match env::var("BCRYPT_COST") {
            Ok(raw) => raw
                .parse::<u32>()
                .map_err(|_| AppError::Config(format!("invalid BCRYPT_COST: {raw}")))?,
            Err(_) => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            database_url,
            session_secret,
            bind_addr,
            bcrypt_cost,
        })
    }
}
