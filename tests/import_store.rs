// tests/import_store.rs
//! Import pipeline against a real SQLite store.

mod common;

use academy::{
    config::ImportConfig,
    import::{import_generic_batch, import_grade_batch, ErrorKind, ImportError, RecordSchema, SqlStore},
    services::auth_service::BcryptHasher,
};
use chrono::NaiveDate;
use common::*;

const ACCOUNTS: &str = "\
username,password,role,nom,prenom,email,class_id
JDupont,pw1,student,dupont,jean,Jean.Dupont@Ecole.fr,
mmartin,pw2,teacher,MARTIN,marie,marie.martin@ecole.fr,
";

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

#[tokio::test]
async fn accounts_are_normalized_hashed_and_persisted() {
    let pool = test_pool().await;
    let config = ImportConfig::default();
    let hasher = BcryptHasher::new(TEST_BCRYPT_COST);

    let mut store = SqlStore::begin(&pool).await.unwrap();
    let result = import_generic_batch(&mut store, &hasher, &config, ACCOUNTS).await.unwrap();
    drop(store);

    assert_eq!(result.record_type, RecordSchema::Account);
    assert!(result.success);
    assert_eq!(result.inserted, 2);

    let (username, email, nom, hash): (String, String, String, String) =
        sqlx::query_as("SELECT username, email, nom, password_hash FROM users WHERE username = 'jdupont'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(username, "jdupont");
    assert_eq!(email, "jean.dupont@ecole.fr");
    assert_eq!(nom, "Dupont");
    assert!(bcrypt::verify("pw1", &hash).unwrap());
}

#[tokio::test]
async fn resubmitting_accounts_reports_duplicates_and_keeps_new_rows() {
    let pool = test_pool().await;
    let config = ImportConfig::default();
    let hasher = BcryptHasher::new(TEST_BCRYPT_COST);

    let mut store = SqlStore::begin(&pool).await.unwrap();
    import_generic_batch(&mut store, &hasher, &config, ACCOUNTS).await.unwrap();
    drop(store);

    let again = format!("{ACCOUNTS}nouveau,pw3,student,Neuf,Paul,paul@ecole.fr,\n");
    let mut store = SqlStore::begin(&pool).await.unwrap();
    let result = import_generic_batch(&mut store, &hasher, &config, &again).await.unwrap();
    drop(store);

    assert!(!result.success);
    assert_eq!(result.inserted, 1);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors.iter().all(|e| e.kind == ErrorKind::Duplicate));
    assert_eq!(result.errors.iter().map(|e| e.line).collect::<Vec<_>>(), vec![2, 3]);
    assert_eq!(count(&pool, "users").await, 3);
}

#[tokio::test]
async fn unknown_class_reference_is_a_row_error() {
    let pool = test_pool().await;
    let class_id = insert_class(&pool, "6A").await;
    let payload = format!(
        "username,password,role,nom,prenom,email,class_id\n\
         a,pw,student,A,A,a@x.fr,{class_id}\n\
         b,pw,student,B,B,b@x.fr,999\n"
    );

    let mut store = SqlStore::begin(&pool).await.unwrap();
    let result = import_generic_batch(&mut store, &BcryptHasher::new(TEST_BCRYPT_COST), &ImportConfig::default(), &payload)
        .await
        .unwrap();
    drop(store);

    assert_eq!(result.inserted, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].line, 3);
    assert_eq!(result.errors[0].message, "unknown class reference");
    assert_eq!(count(&pool, "users").await, 1);
}

#[tokio::test]
async fn classes_are_upper_cased_and_deduplicated() {
    let pool = test_pool().await;
    let payload = "name,level,academic_year\n6a,sixième,2024-2025\n6A,Sixième,2024-2025\n";

    let mut store = SqlStore::begin(&pool).await.unwrap();
    let result = import_generic_batch(&mut store, &BcryptHasher::new(TEST_BCRYPT_COST), &ImportConfig::default(), payload)
        .await
        .unwrap();
    drop(store);

    assert_eq!(result.record_type, RecordSchema::Class);
    assert_eq!(result.inserted, 1);
    assert_eq!(result.errors[0].kind, ErrorKind::Duplicate);
    let name: String = sqlx::query_scalar("SELECT name FROM classes").fetch_one(&pool).await.unwrap();
    assert_eq!(name, "6A");
}

#[tokio::test]
async fn unrecognized_headers_write_nothing() {
    let pool = test_pool().await;
    let mut store = SqlStore::begin(&pool).await.unwrap();
    let err = import_generic_batch(
        &mut store,
        &BcryptHasher::new(TEST_BCRYPT_COST),
        &ImportConfig::default(),
        "foo,bar\n1,2\n",
    )
    .await
    .unwrap_err();
    drop(store);

    assert!(matches!(err, ImportError::UnrecognizedFormat { .. }));
    assert!(err.is_format_error());
    assert_eq!(count(&pool, "users").await, 0);
    assert_eq!(count(&pool, "classes").await, 0);
}

#[tokio::test]
async fn valid_grade_file_is_inserted_with_truncated_comments() {
    let pool = test_pool().await;
    let school = seed_school(&pool).await;
    let long_comment = "c".repeat(300);
    let payload = format!(
        "student_email,subject_name,grade,comments\n\
         ALICE@ecole.fr,Maths,15.5,{long_comment}\n\
         bob@ecole.fr, Maths ,0,\n"
    );

    let mut store = SqlStore::begin(&pool).await.unwrap();
    let result = import_grade_batch(&mut store, &ImportConfig::default(), &payload, school.teacher_id, day())
        .await
        .unwrap();
    drop(store);

    assert!(result.success);
    assert_eq!(result.inserted, 2);

    let (grade, comments, date): (f64, String, NaiveDate) = sqlx::query_as(
        "SELECT grade, comments, evaluation_date FROM grades WHERE subject_id = ?1 ORDER BY grade DESC LIMIT 1",
    )
    .bind(school.maths_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(grade, 15.5);
    assert_eq!(comments.chars().count(), 255);
    assert_eq!(date, day());
}

#[tokio::test]
async fn one_bad_grade_row_aborts_the_whole_file() {
    let pool = test_pool().await;
    let school = seed_school(&pool).await;
    let payload = "\
student_email,subject_name,grade,comments
alice@ecole.fr,Maths,12,
bob@ecole.fr,Maths,21,
ghost@ecole.fr,Maths,10,
alice@ecole.fr,Physique,10,
";

    let mut store = SqlStore::begin(&pool).await.unwrap();
    let result = import_grade_batch(&mut store, &ImportConfig::default(), payload, school.teacher_id, day())
        .await
        .unwrap();
    drop(store);

    assert!(!result.success);
    assert_eq!(result.inserted, 0);
    let messages: Vec<(u64, &str)> = result.errors.iter().map(|e| (e.line, e.message.as_str())).collect();
    assert_eq!(messages[0].0, 3);
    assert!(messages[0].1.starts_with("invalid grade"));
    assert_eq!(messages[1], (4, "student not found"));
    assert_eq!(messages[2], (5, "subject not assigned to teacher"));
    assert_eq!(count(&pool, "grades").await, 0);
}

#[tokio::test]
async fn grade_file_without_required_headers_is_a_format_error() {
    let pool = test_pool().await;
    let school = seed_school(&pool).await;

    let mut store = SqlStore::begin(&pool).await.unwrap();
    let err = import_grade_batch(
        &mut store,
        &ImportConfig::default(),
        "student_email,grade\nalice@ecole.fr,12\n",
        school.teacher_id,
        day(),
    )
    .await
    .unwrap_err();
    drop(store);

    assert!(matches!(err, ImportError::MissingHeaders { .. }));
    assert_eq!(count(&pool, "grades").await, 0);
}
