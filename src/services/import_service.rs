// src/services/import_service.rs
use crate::{
    error::{AppError, AppResult},
    import::{self, ImportError, ImportResult, SqlStore},
    services::auth_service::BcryptHasher,
    state::AppState,
};
use chrono::Local;
use tracing::Instrument;
use uuid::Uuid;

/// Admin upload: accounts or classes, classified from the header line.
/// Holds one store transaction for the whole call.
pub async fn import_generic(state: &AppState, payload: &str) -> AppResult<ImportResult> {
    let span = tracing::info_span!("import", import_id = %Uuid::new_v4(), kind = "generic");
    async {
        let mut store = SqlStore::begin(&state.db_pool).await.map_err(ImportError::from)?;
        let hasher = BcryptHasher::new(state.bcrypt_cost);
        let result = import::import_generic_batch(&mut store, &hasher, &state.import_config, payload).await?;
        Ok::<_, AppError>(result)
    }
    .instrument(span)
    .await
}

/// Teacher upload: grades, only for subjects `teacher_id` teaches.
pub async fn import_grades(state: &AppState, payload: &str, teacher_id: i64) -> AppResult<ImportResult> {
    let span = tracing::info_span!("import", import_id = %Uuid::new_v4(), kind = "grade", teacher_id);
    async {
        let mut store = SqlStore::begin(&state.db_pool).await.map_err(ImportError::from)?;
        let today = Local::now().date_naive();
        let result =
            import::import_grade_batch(&mut store, &state.import_config, payload, teacher_id, today).await?;
        Ok::<_, AppError>(result)
    }
    .instrument(span)
    .await
}
