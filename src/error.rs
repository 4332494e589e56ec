//! Error types for the import pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Errors that stop an import run.
///
/// Routine problems with the source data never surface here: missing files
/// degrade to empty inputs, malformed entries are dropped and per-id write
/// failures are counted by the report.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Database not found at {0:?}; create it before importing")]
    StoreMissing(PathBuf),

    #[error("Database is missing table '{0}'; run `init-db` first")]
    SchemaMissing(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ImportResult<T> = Result<T, ImportError>;
