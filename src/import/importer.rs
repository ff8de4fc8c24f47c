// src/import/importer.rs
//! Drives decoded rows through validation and persistence.
//!
//! The two entry points deliberately commit differently:
//!
//! * admin uploads (accounts, classes) are best effort: each valid row is
//!   written as soon as it is checked, conflicts are recorded per row, and
//!   whatever succeeded is committed at the end;
//! * teacher uploads (grades) are all or nothing: every row is checked
//!   first and a single invalid row means nothing is written.
//!
//! Callers rely on this to decide whether to resubmit only the flagged rows
//! or the whole file.

use crate::{
    config::ImportConfig,
    import::{
        classifier::{classify_generic, require_grade_headers, GenericSchema, RecordSchema},
        decoder::{Decoded, RawRow},
        error::{ImportError, StoreError},
        gateway::{CredentialHasher, StoreGateway},
        normalizer::{normalize_account, normalize_class, normalize_grade},
        report::{Checked, ImportResult, Rejection},
        validator::{validate_account, validate_class, validate_grade},
    },
};
use chrono::NaiveDate;

/// Imports an admin upload of accounts or classes, keeping every row that
/// validates and does not collide with existing data.
pub async fn import_generic_batch<G, H>(
    gateway: &mut G,
    hasher: &H,
    config: &ImportConfig,
    payload: &str,
) -> Result<ImportResult, ImportError>
where
    G: StoreGateway + ?Sized,
    H: CredentialHasher + ?Sized,
{
    let decoded = Decoded::decode(payload)?;
    let schema = classify_generic(&decoded.keys(), config)?;
    tracing::info!("Importing {} rows (best effort)", RecordSchema::from(schema));

    let mut inserted = 0;
    let mut errors = Vec::new();

    for item in decoded.rows() {
        let row = match item {
            Ok(row) => row,
            Err(malformed) => {
                tracing::warn!("Line {}: {}", malformed.line, malformed.message);
                errors.push(malformed);
                continue;
            }
        };

        let outcome = match schema {
            GenericSchema::Account => persist_account(&row, gateway, hasher, config).await?,
            GenericSchema::Class => persist_class(&row, gateway).await?,
        };

        match outcome {
            Ok(rows) => {
                tracing::debug!("Line {}: inserted", row.line());
                inserted += rows;
            }
            Err(rejection) => {
                tracing::warn!("Line {}: {}", row.line(), rejection.message);
                errors.push(rejection.at(&row));
            }
        }
    }

    // Rows already written stay written, whatever failed around them
    gateway.commit().await?;

    let result = ImportResult::new(schema.into(), inserted, errors);
    tracing::info!("Import committed: {}", result.summary());
    Ok(result)
}

async fn persist_account<G, H>(
    row: &RawRow,
    gateway: &mut G,
    hasher: &H,
    config: &ImportConfig,
) -> Result<Checked<u64>, ImportError>
where
    G: StoreGateway + ?Sized,
    H: CredentialHasher + ?Sized,
{
    let account = match validate_account(normalize_account(row), config) {
        Ok(account) => account,
        Err(rejection) => return Ok(Err(rejection)),
    };
    let password_hash = hasher.hash_password(&account.password).await?;
    let record = account.into_record(password_hash);

    settle(
        gateway.insert_account(&record).await,
        "duplicate account: username or email already exists",
    )
}

async fn persist_class<G>(row: &RawRow, gateway: &mut G) -> Result<Checked<u64>, ImportError>
where
    G: StoreGateway + ?Sized,
{
    let class = match validate_class(normalize_class(row)) {
        Ok(class) => class,
        Err(rejection) => return Ok(Err(rejection)),
    };

    settle(
        gateway.insert_class(&class).await,
        "duplicate class: class name already exists",
    )
}

/// Turns constraint violations into row errors; anything else aborts.
fn settle(
    outcome: Result<u64, StoreError>,
    duplicate_message: &str,
) -> Result<Checked<u64>, ImportError> {
    match outcome {
        Ok(rows) => Ok(Ok(rows)),
        Err(StoreError::Duplicate(detail)) => {
            tracing::debug!("Uniqueness conflict: {}", detail);
            Ok(Err(Rejection::duplicate(duplicate_message)))
        }
        Err(StoreError::ForeignKey(detail)) => {
            tracing::debug!("Reference conflict: {}", detail);
            Ok(Err(Rejection::invalid("unknown class reference")))
        }
        Err(e) => Err(e.into()),
    }
}

/// Imports a teacher's grade upload. Nothing is written unless every row is
/// valid; `evaluation_date` is stamped on every inserted grade.
pub async fn import_grade_batch<G>(
    gateway: &mut G,
    config: &ImportConfig,
    payload: &str,
    teacher_id: i64,
    evaluation_date: NaiveDate,
) -> Result<ImportResult, ImportError>
where
    G: StoreGateway + ?Sized,
{
    let decoded = Decoded::decode(payload)?;
    require_grade_headers(&decoded.keys(), config)?;
    tracing::info!("Importing grades for teacher {} (all or nothing)", teacher_id);

    let mut validated = Vec::new();
    let mut errors = Vec::new();

    // Phase 1: check everything, write nothing
    for item in decoded.rows() {
        let row = match item {
            Ok(row) => row,
            Err(malformed) => {
                tracing::warn!("Line {}: {}", malformed.line, malformed.message);
                errors.push(malformed);
                continue;
            }
        };

        match validate_grade(normalize_grade(&row), teacher_id, gateway, config, evaluation_date).await? {
            Ok(record) => validated.push(record),
            Err(rejection) => {
                tracing::warn!("Line {}: {}", row.line(), rejection.message);
                errors.push(rejection.at(&row));
            }
        }
    }

    if !errors.is_empty() {
        tracing::warn!(
            "Grade import aborted: {} invalid row(s), {} valid row(s) discarded",
            errors.len(),
            validated.len()
        );
        return Ok(ImportResult::new(RecordSchema::Grade, 0, errors));
    }

    // Phase 2: one bulk insert
    let inserted = gateway.insert_grades(&validated).await?;
    gateway.commit().await?;

    let result = ImportResult::new(RecordSchema::Grade, inserted, errors);
    tracing::info!("Import committed: {}", result.summary());
    Ok(result)
}
