// src/models/school.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ClassSummary {
    pub id: i64,
    pub name: String,
    pub level: String,
    pub academic_year: String,
    pub student_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TeacherSubject {
    pub id: i64,
    pub name: String,
    pub class_name: String,
    pub student_count: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StudentGrade {
    pub subject: String,
    pub grade: f64,
    pub evaluation_date: Option<NaiveDate>,
    pub teacher: String,
    pub class_name: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScheduleSlot {
    pub name: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
}

// --- Request bodies ---

#[derive(Debug, Deserialize)]
pub struct NewClass {
    pub name: String,
    pub level: String,
    pub academic_year: String,
}

#[derive(Debug, Deserialize)]
pub struct NewSubject {
    pub name: String,
    pub teacher_id: i64,
    pub class_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct NewGrade {
    pub student_id: i64,
    pub subject_id: i64,
    pub grade: f64,
    #[serde(default)]
    pub comments: String,
}

#[derive(Debug, Serialize)]
pub struct Created {
    pub id: i64,
}
