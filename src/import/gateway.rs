// src/import/gateway.rs
use crate::import::{
    error::{ImportError, StoreError},
    validator::{AccountRecord, ClassRecord, GradeRecord},
};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, Transaction};

/// Everything the import pipeline needs from the relational store.
///
/// Writes issued through one gateway belong to a single unit of work and only
/// become durable on `commit`; dropping the gateway without committing
/// discards them.
#[async_trait]
pub trait StoreGateway: Send {
    /// Id of the account with this e-mail, provided its role is student.
    async fn find_student_by_email(&mut self, email: &str) -> Result<Option<i64>, StoreError>;

    /// Id of the subject with this name, provided `teacher_id` teaches it.
    async fn find_subject_for_teacher(
        &mut self,
        name: &str,
        teacher_id: i64,
    ) -> Result<Option<i64>, StoreError>;

    async fn insert_account(&mut self, account: &AccountRecord) -> Result<u64, StoreError>;

    async fn insert_class(&mut self, class: &ClassRecord) -> Result<u64, StoreError>;

    async fn insert_grades(&mut self, grades: &[GradeRecord]) -> Result<u64, StoreError>;

    async fn commit(&mut self) -> Result<(), StoreError>;
}

/// One-way transform applied to imported passwords.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    async fn hash_password(&self, plaintext: &str) -> Result<String, ImportError>;
}

// SQLite caps bound parameters per statement; five per grade row
const GRADE_INSERT_CHUNK: usize = 500;

/// `StoreGateway` over a SQLite transaction held for the whole import.
pub struct SqlStore {
    tx: Option<Transaction<'static, Sqlite>>,
}

impl SqlStore {
    pub async fn begin(pool: &SqlitePool) -> Result<Self, StoreError> {
        let tx = pool.begin().await?;
        Ok(Self { tx: Some(tx) })
    }

    fn tx(&mut self) -> Result<&mut Transaction<'static, Sqlite>, StoreError> {
        self.tx.as_mut().ok_or(StoreError::Closed)
    }
}

#[async_trait]
impl StoreGateway for SqlStore {
    async fn find_student_by_email(&mut self, email: &str) -> Result<Option<i64>, StoreError> {
        let tx = self.tx()?;
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM users WHERE email = ?1 AND role = 'student'",
        )
        .bind(email)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(id)
    }

    async fn find_subject_for_teacher(
        &mut self,
        name: &str,
        teacher_id: i64,
    ) -> Result<Option<i64>, StoreError> {
        let tx = self.tx()?;
        let id = sqlx::query_scalar::<_, i64>(
            "SELECT id FROM subjects WHERE name = ?1 AND teacher_id = ?2",
        )
        .bind(name)
        .bind(teacher_id)
        .fetch_optional(&mut **tx)
        .await?;
        Ok(id)
    }

    async fn insert_account(&mut self, account: &AccountRecord) -> Result<u64, StoreError> {
        let tx = self.tx()?;
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, role, nom, prenom, email, class_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role)
        .bind(&account.nom)
        .bind(&account.prenom)
        .bind(&account.email)
        .bind(account.class_id)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn insert_class(&mut self, class: &ClassRecord) -> Result<u64, StoreError> {
        let tx = self.tx()?;
        let result = sqlx::query(
            "INSERT INTO classes (name, level, academic_year) VALUES (?1, ?2, ?3)",
        )
        .bind(&class.name)
        .bind(&class.level)
        .bind(&class.academic_year)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    async fn insert_grades(&mut self, grades: &[GradeRecord]) -> Result<u64, StoreError> {
        let tx = self.tx()?;
        let mut inserted = 0;
        for chunk in grades.chunks(GRADE_INSERT_CHUNK) {
            let mut builder = QueryBuilder::<Sqlite>::new(
                "INSERT INTO grades (student_id, subject_id, grade, comments, evaluation_date) ",
            );
            builder.push_values(chunk, |mut row, grade| {
                row.push_bind(grade.student_id)
                    .push_bind(grade.subject_id)
                    .push_bind(grade.grade)
                    .push_bind(grade.comments.clone())
                    .push_bind(grade.evaluation_date);
            });
            inserted += builder.build().execute(&mut **tx).await?.rows_affected();
        }
        Ok(inserted)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        match self.tx.take() {
            Some(tx) => {
                tx.commit().await?;
                Ok(())
            }
            None => Err(StoreError::Closed),
        }
    }
}
