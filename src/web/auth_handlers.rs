// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{CurrentUser, LoginForm, User},
    services::auth_service,
    state::AppState,
    templates::LoginPage,
    web::mw_auth::SESSION_USER_KEY,
};
use askama::Template;
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
    Json,
};
use serde_json::json;
use tower_sessions::Session;

// GET /login
pub async fn show_login_form(session: Session) -> impl IntoResponse {
    if session.get::<CurrentUser>(SESSION_USER_KEY).await.ok().flatten().is_some() {
        tracing::debug!("GET /login: already logged in, redirecting to /import");
        return Redirect::to("/import").into_response();
    }
    render_login(None).into_response()
}

// POST /login (HTML form)
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    match auth_service::authenticate(&state.db_pool, &form.username, &form.password).await {
        Ok(user) => {
            start_session(&session, &user).await?;
            Ok(Redirect::to("/import").into_response())
        }
        Err(AppError::InvalidCredentials) => {
            Ok(render_login(Some("Invalid username or password.".to_string())).into_response())
        }
        Err(e) => Err(e),
    }
}

// POST /api/login (JSON)
pub async fn api_login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginForm>,
) -> AppResult<impl IntoResponse> {
    if body.username.trim().is_empty() || body.password.is_empty() {
        return Err(AppError::BadRequest("username and password are required".into()));
    }
    let user = auth_service::authenticate(&state.db_pool, &body.username, &body.password).await?;
    start_session(&session, &user).await?;
    Ok(Json(json!({
        "id": user.id,
        "username": user.username,
        "role": user.role,
    })))
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    end_session(&session).await?;
    Ok(Redirect::to("/login"))
}

// POST /api/logout
pub async fn api_logout(session: Session) -> AppResult<StatusCode> {
    end_session(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn start_session(session: &Session, user: &User) -> AppResult<()> {
    // Fresh session id on every login
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to cycle id: {}", e)))?;
    session
        .insert(SESSION_USER_KEY, CurrentUser { id: user.id, role: user.role })
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to write session: {}", e)))?;
    Ok(())
}

async fn end_session(session: &Session) -> AppResult<()> {
    let user: Option<CurrentUser> = session.get(SESSION_USER_KEY).await.ok().flatten();

    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Failed to delete session: {}", e)))?;

    match user {
        Some(user) => tracing::info!("🚪 User {} logged out.", user.id),
        None => tracing::info!("🚪 Anonymous session closed."),
    }
    Ok(())
}

fn render_login(error: Option<String>) -> impl IntoResponse {
    let template = LoginPage { error };
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render login template: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load the page.").into_response()
        }
    }
}
