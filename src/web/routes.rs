// src/web/routes.rs
use crate::{
    error::AppError,
    state::AppState,
    web::{api_handlers, auth_handlers, import_handlers, mw_auth, mw_role},
};
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::Redirect,
    routing::{get, post},
    Router,
};

// Largest CSV accepted by the upload endpoints
const UPLOAD_LIMIT_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router(app_state: AppState) -> Router {
    // --- Public routes ---
    let public_routes = Router::new()
        .route("/", get(|| async { Redirect::permanent("/login") }))
        .route("/api/health", get(api_handlers::health))
        .route("/login", get(auth_handlers::show_login_form).post(auth_handlers::handle_login))
        .route("/logout", get(auth_handlers::handle_logout))
        .route("/api/login", post(auth_handlers::api_login))
        .route("/api/logout", post(auth_handlers::api_logout));

    // --- Admin routes ---
    let admin_routes = Router::new()
        .route("/api/users", get(api_handlers::list_users))
        .route("/api/classes", get(api_handlers::list_classes).post(api_handlers::create_class))
        .route("/api/teachers", get(api_handlers::list_teachers))
        .route("/api/subjects", post(api_handlers::create_subject))
        .route_layer(middleware::from_fn(mw_role::require_admin));

    // --- Teacher routes ---
    let teacher_routes = Router::new()
        .route("/api/subjects", get(api_handlers::list_my_subjects))
        .route("/api/students", get(api_handlers::list_my_students))
        .route("/api/grades", post(api_handlers::add_grade))
        .route_layer(middleware::from_fn(mw_role::require_teacher));

    // --- Student routes ---
    let student_routes = Router::new()
        .route("/api/grades", get(api_handlers::list_my_grades))
        .route("/api/schedule", get(api_handlers::my_schedule))
        .route_layer(middleware::from_fn(mw_role::require_student));

    // --- Authenticated routes ---
    // Uploads pick the import flavour from the caller's role
    let authenticated_routes = Router::new()
        .route(
            "/api/upload",
            post(import_handlers::api_upload).layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        .route(
            "/import",
            get(import_handlers::show_import_page)
                .post(import_handlers::handle_import_form)
                .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES)),
        )
        // Same path, different methods: the method routers are merged
        .merge(admin_routes)
        .merge(teacher_routes)
        .merge(student_routes)
        // require_auth wraps every route above, role guards included
        .route_layer(middleware::from_fn(mw_auth::require_auth));

    // --- Final router ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .fallback(|| async { AppError::NotFound })
        .with_state(app_state)
}
