// src/import/mod.rs
//! Bulk CSV import: decode → classify → normalize → validate → persist.

pub mod classifier;
pub mod decoder;
pub mod error;
pub mod gateway;
pub mod importer;
pub mod normalizer;
pub mod report;
pub mod validator;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::RecordSchema;
pub use error::{ImportError, StoreError};
pub use gateway::{CredentialHasher, SqlStore, StoreGateway};
pub use importer::{import_generic_batch, import_grade_batch};
pub use report::{ErrorKind, ImportResult, ValidationError};
