// src/error.rs
use crate::import::ImportError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Environment variable error: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Password processing failed")]
    PasswordHashingError,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Import failed: {0}")]
    Import(#[from] ImportError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found")]
    NotFound,

    #[error("Unexpected internal error")]
    InternalServerError,

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,
}

impl AppError {
    /// Status code and the message safe to show to the caller.
    pub fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Data access failed.".to_string())
            }
            AppError::EnvVarError(_) | AppError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration error.".to_string())
            }
            AppError::PasswordHashingError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Credential processing failed.".to_string())
            }
            // Same message for an unknown user and a wrong password
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid username or password.".to_string())
            }
            AppError::SessionError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Session handling failed.".to_string())
            }
            AppError::Import(e) if e.is_format_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Import(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Import aborted: the store is unavailable.".to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Endpoint not found.".to_string()),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Not authenticated.".to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Access denied.".to_string()),
            AppError::InternalServerError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Unexpected error.".to_string())
            }
        }
    }

    pub fn log(&self, status: StatusCode) {
        if status.is_server_error() {
            tracing::error!("Request failed: {:?}", self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
    }
}

// How an AppError becomes an HTTP response
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, user_message) = self.status_and_message();
        self.log(status);

        (status, Json(json!({ "error": user_message }))).into_response()
    }
}

pub type AppResult<T = ()> = Result<T, AppError>;
