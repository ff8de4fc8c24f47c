// src/web/import_handlers.rs
use crate::{
    error::{AppError, AppResult},
    import::ImportResult,
    models::user::{CurrentUser, Role},
    services::import_service,
    state::AppState,
    templates::ImportPage,
};
use askama::Template;
use axum::{
    extract::{Extension, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};

/// Multipart field that carries the CSV file.
const FILE_FIELD: &str = "file";

// POST /api/upload
pub async fn api_upload(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    ensure_can_import(user)?;
    let payload = read_file_field(multipart).await?;
    let result = run_import(&state, user, &payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

// GET /import
pub async fn show_import_page(Extension(user): Extension<CurrentUser>) -> impl IntoResponse {
    render_import(ImportPage {
        role: user.role,
        result: None,
        error: None,
    })
}

// POST /import (HTML form)
pub async fn handle_import_form(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    multipart: Multipart,
) -> impl IntoResponse {
    let outcome = async {
        ensure_can_import(user)?;
        let payload = read_file_field(multipart).await?;
        run_import(&state, user, &payload).await
    }
    .await;

    let page = match outcome {
        Ok(result) => ImportPage {
            role: user.role,
            result: Some(result),
            error: None,
        },
        Err(e) => {
            let (status, message) = e.status_and_message();
            e.log(status);
            let page = ImportPage {
                role: user.role,
                result: None,
                error: Some(message),
            };
            return (status, render_import(page)).into_response();
        }
    };
    render_import(page).into_response()
}

fn ensure_can_import(user: CurrentUser) -> AppResult<()> {
    match user.role {
        Role::Admin | Role::Teacher => Ok(()),
        Role::Student => {
            tracing::warn!("Upload refused for student {}", user.id);
            Err(AppError::Forbidden)
        }
    }
}

async fn run_import(state: &AppState, user: CurrentUser, payload: &str) -> AppResult<ImportResult> {
    match user.role {
        Role::Admin => import_service::import_generic(state, payload).await,
        Role::Teacher => import_service::import_grades(state, payload, user.id).await,
        Role::Student => Err(AppError::Forbidden),
    }
}

async fn read_file_field(mut multipart: Multipart) -> AppResult<String> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {}", e)))?;
        tracing::info!("📥 Received '{}' ({} bytes)", file_name, bytes.len());
        return String::from_utf8(bytes.to_vec())
            .map_err(|_| AppError::BadRequest("the file is not valid UTF-8 text".into()));
    }
    Err(AppError::BadRequest(format!("missing '{}' field", FILE_FIELD)))
}

fn render_import(page: ImportPage) -> impl IntoResponse {
    match page.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render import template: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load the page.").into_response()
        }
    }
}
