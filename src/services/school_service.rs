// src/services/school_service.rs
use crate::{
    config::ImportConfig,
    error::{AppError, AppResult},
    import::StoreError,
    models::school::{ClassSummary, NewClass, NewGrade, NewSubject, ScheduleSlot, StudentGrade, TeacherSubject},
};
use sqlx::SqlitePool;

// Constraint violations become client errors; the rest stays a database error
fn constraint_error(err: sqlx::Error, duplicate: &str, reference: &str) -> AppError {
    match StoreError::from(err) {
        StoreError::Duplicate(_) => AppError::Conflict(duplicate.to_string()),
        StoreError::ForeignKey(_) => AppError::BadRequest(reference.to_string()),
        StoreError::Database(e) => AppError::SqlxError(e),
        StoreError::Closed => AppError::InternalServerError,
    }
}

// --- Classes ---

pub async fn list_classes(db_pool: &SqlitePool) -> AppResult<Vec<ClassSummary>> {
    let classes = sqlx::query_as::<_, ClassSummary>(
        r#"
        SELECT
            c.id, c.name, c.level, c.academic_year,
            (SELECT COUNT(*) FROM users u WHERE u.class_id = c.id AND u.role = 'student') AS student_count
        FROM classes c
        ORDER BY c.academic_year DESC, c.name ASC
        "#,
    )
    .fetch_all(db_pool)
    .await?;
    Ok(classes)
}

pub async fn create_class(db_pool: &SqlitePool, class: &NewClass) -> AppResult<i64> {
    let name = class.name.trim().to_uppercase();
    if name.is_empty() || class.level.trim().is_empty() || class.academic_year.trim().is_empty() {
        return Err(AppError::BadRequest("name, level and academic_year are required".into()));
    }
    tracing::info!("Creating class {}", name);

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO classes (name, level, academic_year) VALUES (?1, ?2, ?3) RETURNING id",
    )
    .bind(&name)
    .bind(class.level.trim())
    .bind(class.academic_year.trim())
    .fetch_one(db_pool)
    .await
    .map_err(|e| constraint_error(e, &format!("class {name} already exists"), "invalid class"))?;

    tracing::info!("✅ Class {} created with id {}", name, id);
    Ok(id)
}

// --- Subjects ---

pub async fn create_subject(db_pool: &SqlitePool, subject: &NewSubject) -> AppResult<i64> {
    let name = subject.name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }

    let is_teacher: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1 AND role = 'teacher')",
    )
    .bind(subject.teacher_id)
    .fetch_one(db_pool)
    .await?;
    if !is_teacher {
        return Err(AppError::BadRequest(format!("user {} is not a teacher", subject.teacher_id)));
    }

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO subjects (name, teacher_id, class_id) VALUES (?1, ?2, ?3) RETURNING id",
    )
    .bind(name)
    .bind(subject.teacher_id)
    .bind(subject.class_id)
    .fetch_one(db_pool)
    .await
    .map_err(|e| constraint_error(e, "subject already exists", "unknown class"))?;

    tracing::info!("✅ Subject '{}' created with id {}", name, id);
    Ok(id)
}

pub async fn list_subjects_for_teacher(db_pool: &SqlitePool, teacher_id: i64) -> AppResult<Vec<TeacherSubject>> {
    let subjects = sqlx::query_as::<_, TeacherSubject>(
        r#"
        SELECT
            s.id, s.name, c.name AS class_name,
            (SELECT COUNT(*) FROM users u WHERE u.class_id = c.id AND u.role = 'student') AS student_count
        FROM subjects s
        JOIN classes c ON s.class_id = c.id
        WHERE s.teacher_id = ?1
        ORDER BY c.name, s.name
        "#,
    )
    .bind(teacher_id)
    .fetch_all(db_pool)
    .await?;
    Ok(subjects)
}

// --- Grades ---

/// Records one grade by hand, under the same rules as a grade import.
pub async fn add_grade(
    db_pool: &SqlitePool,
    config: &ImportConfig,
    teacher_id: i64,
    grade: &NewGrade,
) -> AppResult<i64> {
    if !grade.grade.is_finite() || grade.grade < config.min_grade || grade.grade > config.max_grade {
        return Err(AppError::BadRequest(format!(
            "invalid grade: expected a number between {} and {}",
            config.min_grade, config.max_grade
        )));
    }

    let is_student: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1 AND role = 'student')",
    )
    .bind(grade.student_id)
    .fetch_one(db_pool)
    .await?;
    if !is_student {
        return Err(AppError::BadRequest("student not found".into()));
    }

    let owns_subject: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM subjects WHERE id = ?1 AND teacher_id = ?2)",
    )
    .bind(grade.subject_id)
    .bind(teacher_id)
    .fetch_one(db_pool)
    .await?;
    if !owns_subject {
        return Err(AppError::BadRequest("subject not assigned to teacher".into()));
    }

    let comments: String = grade.comments.chars().take(config.max_comment_chars).collect();
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO grades (student_id, subject_id, grade, comments, evaluation_date)
        VALUES (?1, ?2, ?3, ?4, date('now'))
        RETURNING id
        "#,
    )
    .bind(grade.student_id)
    .bind(grade.subject_id)
    .bind(grade.grade)
    .bind(comments)
    .fetch_one(db_pool)
    .await?;

    tracing::info!("✅ Grade {} recorded by teacher {}", id, teacher_id);
    Ok(id)
}

pub async fn list_grades_for_student(db_pool: &SqlitePool, student_id: i64) -> AppResult<Vec<StudentGrade>> {
    let grades = sqlx::query_as::<_, StudentGrade>(
        r#"
        SELECT
            s.name AS subject, g.grade, g.evaluation_date,
            TRIM(COALESCE(t.prenom, '') || ' ' || COALESCE(t.nom, '')) AS teacher,
            c.name AS class_name
        FROM grades g
        JOIN subjects s ON g.subject_id = s.id
        JOIN users t ON s.teacher_id = t.id
        JOIN classes c ON s.class_id = c.id
        WHERE g.student_id = ?1
        ORDER BY g.evaluation_date DESC, s.name
        "#,
    )
    .bind(student_id)
    .fetch_all(db_pool)
    .await?;
    Ok(grades)
}

// --- Schedule ---

pub async fn schedule_for_student(db_pool: &SqlitePool, student_id: i64) -> AppResult<Vec<ScheduleSlot>> {
    let slots = sqlx::query_as::<_, ScheduleSlot>(
        r#"
        SELECT s.name, sch.day, sch.start_time, sch.end_time
        FROM schedule sch
        JOIN subjects s ON sch.subject_id = s.id
        WHERE s.class_id = (SELECT class_id FROM users WHERE id = ?1)
        ORDER BY
            CASE sch.day
                WHEN 'LUNDI' THEN 1 WHEN 'MARDI' THEN 2 WHEN 'MERCREDI' THEN 3
                WHEN 'JEUDI' THEN 4 WHEN 'VENDREDI' THEN 5 ELSE 6
            END,
            sch.start_time
        "#,
    )
    .bind(student_id)
    .fetch_all(db_pool)
    .await?;
    Ok(slots)
}
