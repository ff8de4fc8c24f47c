// src/state.rs
use crate::config::ImportConfig;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub import_config: Arc<ImportConfig>,
    pub bcrypt_cost: u32,
}

