// src/services/user_service.rs
use crate::{
    error::AppResult,
    models::user::{StudentSummary, TeacherSummary, User, UserSummary},
};
use sqlx::SqlitePool;

const USER_COLUMNS: &str = r#"
    id, username, password_hash, role, nom, prenom, email, class_id,
    created_at, last_login
"#;

pub async fn find_user_by_username(db_pool: &SqlitePool, username: &str) -> AppResult<Option<User>> {
    tracing::debug!("Looking up user by username: {}", username);
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?1"
    ))
    .bind(username)
    .fetch_optional(db_pool)
    .await?;
    Ok(user)
}

pub async fn touch_last_login(db_pool: &SqlitePool, user_id: i64) -> AppResult<()> {
    sqlx::query("UPDATE users SET last_login = CURRENT_TIMESTAMP WHERE id = ?1")
        .bind(user_id)
        .execute(db_pool)
        .await?;
    Ok(())
}

/// Admin search over username and names. An account counts as active when
/// it logged in during the last six months.
pub async fn search_users(db_pool: &SqlitePool, term: &str) -> AppResult<Vec<UserSummary>> {
    let pattern = format!("%{}%", term.trim());
    tracing::debug!("Searching users matching '{}'", pattern);
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT
            id, username, role, nom, prenom, email, class_id,
            CASE WHEN last_login > datetime('now', '-6 months') THEN 'Active' ELSE 'Inactive' END AS status
        FROM users
        WHERE username LIKE ?1 OR nom LIKE ?1 OR prenom LIKE ?1
        ORDER BY id ASC
        "#,
    )
    .bind(pattern)
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Found {} users.", users.len());
    Ok(users)
}

pub async fn list_teachers(db_pool: &SqlitePool) -> AppResult<Vec<TeacherSummary>> {
    let teachers = sqlx::query_as::<_, TeacherSummary>(
        r#"
        SELECT
            u.id, u.nom, u.prenom, u.email,
            (SELECT COUNT(*) FROM subjects s WHERE s.teacher_id = u.id) AS subject_count
        FROM users u
        WHERE u.role = 'teacher'
        ORDER BY u.nom, u.prenom
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    Ok(teachers)
}

/// Students enrolled in any class where this teacher has a subject.
pub async fn list_students_for_teacher(
    db_pool: &SqlitePool,
    teacher_id: i64,
) -> AppResult<Vec<StudentSummary>> {
    let students = sqlx::query_as::<_, StudentSummary>(
        r#"
        SELECT DISTINCT u.id, u.nom, u.prenom, u.email, c.name AS class_name
        FROM users u
        JOIN classes c ON u.class_id = c.id
        JOIN subjects s ON s.class_id = c.id
        WHERE s.teacher_id = ?1 AND u.role = 'student'
        ORDER BY c.name, u.nom, u.prenom
        "#,
    )
    .bind(teacher_id)
    .fetch_all(db_pool)
    .await?;
    Ok(students)
}
