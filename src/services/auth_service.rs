// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    import::{CredentialHasher, ImportError},
    models::user::User,
    services::user_service,
};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Checks a password against the stored bcrypt hash.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verifying bcrypt hash...");
        bcrypt::verify(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("spawn_blocking task failed (verify_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("bcrypt failed to verify password: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Produces a bcrypt hash of a password at the given cost.
pub async fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Generating bcrypt hash...");
        bcrypt::hash(&password, cost)
    })
    .await
    .map_err(|e| {
        tracing::error!("spawn_blocking task failed (hash_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("bcrypt failed to hash password: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Credential hasher handed to the account import.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

#[async_trait]
impl CredentialHasher for BcryptHasher {
    async fn hash_password(&self, plaintext: &str) -> Result<String, ImportError> {
        hash_password(plaintext, self.cost)
            .await
            .map_err(|e| ImportError::Hashing(e.to_string()))
    }
}

/// Resolves a username/password pair to its account and stamps `last_login`.
pub async fn authenticate(db_pool: &SqlitePool, username: &str, password: &str) -> AppResult<User> {
    let username = username.trim().to_lowercase();
    tracing::info!("Login attempt for: {}", username);

    let Some(user) = user_service::find_user_by_username(db_pool, &username).await? else {
        tracing::warn!("Unknown user: {}", username);
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash).await? {
        tracing::warn!("Wrong password for: {}", username);
        return Err(AppError::InvalidCredentials);
    }

    user_service::touch_last_login(db_pool, user.id).await?;
    tracing::info!("✅ Login succeeded for: {} ({})", user.username, user.role);
    Ok(user)
}
