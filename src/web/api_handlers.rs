// src/web/api_handlers.rs
//! JSON endpoints. Role checks happen in the route layers; handlers only
//! read the caller's identity where the data is scoped to it.

use crate::{
    error::AppResult,
    models::{
        school::{ClassSummary, Created, NewClass, NewGrade, NewSubject, ScheduleSlot, StudentGrade, TeacherSubject},
        user::{CurrentUser, StudentSummary, TeacherSummary, UserSummary},
    },
    services::{school_service, user_service},
    state::AppState,
};
use axum::{
    extract::{Extension, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

// GET /api/health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

#[derive(Debug, Deserialize)]
pub struct UserSearch {
    #[serde(default)]
    pub search: String,
}

// --- Admin ---

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<UserSearch>,
) -> AppResult<Json<Vec<UserSummary>>> {
    let users = user_service::search_users(&state.db_pool, &params.search).await?;
    Ok(Json(users))
}

pub async fn list_classes(State(state): State<AppState>) -> AppResult<Json<Vec<ClassSummary>>> {
    Ok(Json(school_service::list_classes(&state.db_pool).await?))
}

pub async fn create_class(
    State(state): State<AppState>,
    Json(body): Json<NewClass>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let id = school_service::create_class(&state.db_pool, &body).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn list_teachers(State(state): State<AppState>) -> AppResult<Json<Vec<TeacherSummary>>> {
    Ok(Json(user_service::list_teachers(&state.db_pool).await?))
}

pub async fn create_subject(
    State(state): State<AppState>,
    Json(body): Json<NewSubject>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let id = school_service::create_subject(&state.db_pool, &body).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

// --- Teacher ---

pub async fn list_my_subjects(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<TeacherSubject>>> {
    Ok(Json(school_service::list_subjects_for_teacher(&state.db_pool, user.id).await?))
}

pub async fn list_my_students(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<StudentSummary>>> {
    Ok(Json(user_service::list_students_for_teacher(&state.db_pool, user.id).await?))
}

pub async fn add_grade(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<NewGrade>,
) -> AppResult<(StatusCode, Json<Created>)> {
    let id = school_service::add_grade(&state.db_pool, &state.import_config, user.id, &body).await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

// --- Student ---

pub async fn list_my_grades(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<StudentGrade>>> {
    Ok(Json(school_service::list_grades_for_student(&state.db_pool, user.id).await?))
}

pub async fn my_schedule(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ScheduleSlot>>> {
    Ok(Json(school_service::schedule_for_student(&state.db_pool, user.id).await?))
}
