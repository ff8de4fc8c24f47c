// tests/common/mod.rs
#![allow(dead_code)]

use academy::{config::ImportConfig, db, services::auth_service, state::AppState};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, sync::Arc};

pub const TEST_BCRYPT_COST: u32 = 4;

/// Fresh in-memory database with the real migrations applied.
///
/// A single connection that never expires keeps the in-memory database alive
/// for the whole test.
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("in-memory pool");
    db::run_migrations(&pool).await.expect("migrations");
    pool
}

pub fn test_state(pool: SqlitePool) -> AppState {
    AppState {
        db_pool: pool,
        import_config: Arc::new(ImportConfig::default()),
        bcrypt_cost: TEST_BCRYPT_COST,
    }
}

pub async fn insert_class(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar("INSERT INTO classes (name, level, academic_year) VALUES (?1, 'Sixième', '2024-2025') RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .expect("insert class")
}

pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    role: &str,
    email: &str,
    class_id: Option<i64>,
) -> i64 {
    let hash = auth_service::hash_password(password, TEST_BCRYPT_COST)
        .await
        .expect("hash");
    sqlx::query_scalar(
        r#"
        INSERT INTO users (username, password_hash, role, nom, prenom, email, class_id)
        VALUES (?1, ?2, ?3, 'Nom', 'Prenom', ?4, ?5)
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(hash)
    .bind(role)
    .bind(email)
    .bind(class_id)
    .fetch_one(pool)
    .await
    .expect("insert user")
}

pub async fn insert_subject(pool: &SqlitePool, name: &str, teacher_id: i64, class_id: i64) -> i64 {
    sqlx::query_scalar("INSERT INTO subjects (name, teacher_id, class_id) VALUES (?1, ?2, ?3) RETURNING id")
        .bind(name)
        .bind(teacher_id)
        .bind(class_id)
        .fetch_one(pool)
        .await
        .expect("insert subject")
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count")
}

/// A school with one class, one teacher teaching Maths there and two students.
pub struct School {
    pub class_id: i64,
    pub teacher_id: i64,
    pub other_teacher_id: i64,
    pub maths_id: i64,
    pub physics_id: i64,
}

pub async fn seed_school(pool: &SqlitePool) -> School {
    let class_id = insert_class(pool, "6A").await;
    let teacher_id = insert_user(pool, "prof", "prof-pw", "teacher", "prof@ecole.fr", None).await;
    let other_teacher_id = insert_user(pool, "autre", "autre-pw", "teacher", "autre@ecole.fr", None).await;
    insert_user(pool, "alice", "alice-pw", "student", "alice@ecole.fr", Some(class_id)).await;
    insert_user(pool, "bob", "bob-pw", "student", "bob@ecole.fr", Some(class_id)).await;
    let maths_id = insert_subject(pool, "Maths", teacher_id, class_id).await;
    let physics_id = insert_subject(pool, "Physique", other_teacher_id, class_id).await;
    School {
        class_id,
        teacher_id,
        other_teacher_id,
        maths_id,
        physics_id,
    }
}
