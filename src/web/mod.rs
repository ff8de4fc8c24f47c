// src/web/mod.rs
pub mod api_handlers;
pub mod auth_handlers;
pub mod import_handlers;
pub mod mw_auth;
pub mod mw_role;
pub mod routes;
