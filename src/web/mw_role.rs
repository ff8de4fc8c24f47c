// src/web/mw_role.rs
use crate::{
    error::AppError,
    models::user::{CurrentUser, Role},
};
use axum::{
    extract::{Extension, Request},
    middleware::Next,
    response::Response,
};

/// Role guards. Must run *after* `require_auth`, which puts `CurrentUser`
/// in the request extensions.
pub async fn require_admin(
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(user, Role::Admin, request, next).await
}

pub async fn require_teacher(
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(user, Role::Teacher, request, next).await
}

pub async fn require_student(
    Extension(user): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_role(user, Role::Student, request, next).await
}

async fn require_role(
    user: CurrentUser,
    required: Role,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if user.role == required {
        tracing::debug!("Role MW: {} access granted to user {}", required, user.id);
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            "Role MW: access denied to user {} ({}), {} required for {}",
            user.id,
            user.role,
            required,
            request.uri().path()
        );
        Err(AppError::Forbidden)
    }
}
