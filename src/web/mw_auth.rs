// src/web/mw_auth.rs
use crate::{error::AppError, models::user::CurrentUser};
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Session key under which the logged-in identity is stored.
pub const SESSION_USER_KEY: &str = "user";

// Middleware that checks the caller is logged in
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match session.get::<CurrentUser>(SESSION_USER_KEY).await {
        Ok(Some(user)) => {
            tracing::debug!("Auth MW: user {} ({}) authenticated.", user.id, user.role);
            // Handlers read the identity from the request extensions
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Ok(None) => {
            // API clients get a 401, browsers are sent to the login form
            if request.uri().path().starts_with("/api/") {
                tracing::debug!("Auth MW: unauthenticated API call to {}", request.uri().path());
                Err(AppError::Unauthorized)
            } else {
                tracing::debug!("Auth MW: not authenticated. Redirecting to /login");
                Ok(Redirect::to("/login").into_response())
            }
        }
        Err(e) => {
            tracing::error!("Auth MW: failed to read session: {:?}", e);
            Err(AppError::SessionError(format!("Failed to check session: {}", e)))
        }
    }
}
