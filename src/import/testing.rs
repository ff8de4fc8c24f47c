// src/import/testing.rs
//! In-memory collaborators for exercising the pipeline without a database.

use crate::import::{
    error::{ImportError, StoreError},
    gateway::{CredentialHasher, StoreGateway},
    validator::{AccountRecord, ClassRecord, GradeRecord},
};
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct FakeStore {
    students: HashMap<String, i64>,
    // (name, teacher_id, subject_id)
    subjects: Vec<(String, i64, i64)>,
    taken_usernames: Vec<String>,
    taken_class_names: Vec<String>,
    fail_lookups: bool,
    fail_writes: bool,

    pub lookups: usize,
    pub accounts: Vec<AccountRecord>,
    pub classes: Vec<ClassRecord>,
    pub grades: Vec<GradeRecord>,
    pub grade_batches: usize,
    pub commits: usize,
}

impl FakeStore {
    pub fn with_student(mut self, email: &str, id: i64) -> Self {
        self.students.insert(email.to_string(), id);
        self
    }

    pub fn with_subject(mut self, name: &str, teacher_id: i64, id: i64) -> Self {
        self.subjects.push((name.to_string(), teacher_id, id));
        self
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.taken_usernames.push(username.to_string());
        self
    }

    pub fn with_class_name(mut self, name: &str) -> Self {
        self.taken_class_names.push(name.to_string());
        self
    }

    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Rows written through any insert, committed or not.
    pub fn writes(&self) -> usize {
        self.accounts.len() + self.classes.len() + self.grades.len()
    }

    fn outage() -> StoreError {
        StoreError::Database(sqlx::Error::PoolTimedOut)
    }
}

#[async_trait]
impl StoreGateway for FakeStore {
    async fn find_student_by_email(&mut self, email: &str) -> Result<Option<i64>, StoreError> {
        if self.fail_lookups {
            return Err(Self::outage());
        }
        self.lookups += 1;
        Ok(self.students.get(email).copied())
    }

    async fn find_subject_for_teacher(
        &mut self,
        name: &str,
        teacher_id: i64,
    ) -> Result<Option<i64>, StoreError> {
        if self.fail_lookups {
            return Err(Self::outage());
        }
        self.lookups += 1;
        Ok(self
            .subjects
            .iter()
            .find(|(n, t, _)| n == name && *t == teacher_id)
            .map(|(_, _, id)| *id))
    }

    async fn insert_account(&mut self, account: &AccountRecord) -> Result<u64, StoreError> {
        if self.fail_writes {
            return Err(Self::outage());
        }
        if self.taken_usernames.contains(&account.username) {
            return Err(StoreError::Duplicate("UNIQUE constraint failed: users.username".into()));
        }
        self.taken_usernames.push(account.username.clone());
        self.accounts.push(account.clone());
        Ok(1)
    }

    async fn insert_class(&mut self, class: &ClassRecord) -> Result<u64, StoreError> {
        if self.fail_writes {
            return Err(Self::outage());
        }
        if self.taken_class_names.contains(&class.name) {
            return Err(StoreError::Duplicate("UNIQUE constraint failed: classes.name".into()));
        }
        self.taken_class_names.push(class.name.clone());
        self.classes.push(class.clone());
        Ok(1)
    }

    async fn insert_grades(&mut self, grades: &[GradeRecord]) -> Result<u64, StoreError> {
        if self.fail_writes {
            return Err(Self::outage());
        }
        self.grade_batches += 1;
        self.grades.extend_from_slice(grades);
        Ok(grades.len() as u64)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.commits += 1;
        Ok(())
    }
}

/// Reversible stand-in for bcrypt so tests can see what was hashed.
#[derive(Debug, Default)]
pub struct FakeHasher {
    pub broken: bool,
}

#[async_trait]
impl CredentialHasher for FakeHasher {
    async fn hash_password(&self, plaintext: &str) -> Result<String, ImportError> {
        if self.broken {
            return Err(ImportError::Hashing("hasher unavailable".into()));
        }
        Ok(format!("hashed:{plaintext}"))
    }
}
