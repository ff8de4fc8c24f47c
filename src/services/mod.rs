// src/services/mod.rs
pub mod auth_service;
pub mod import_service;
pub mod school_service;
pub mod user_service;
