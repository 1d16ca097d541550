use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MartError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source file for table '{table}' unavailable: {path}")]
    SourceUnavailable { table: String, path: PathBuf },

    #[error("Unknown table '{name}'")]
    UnknownTable { name: String },

    #[error("Integrity check failed: {violations} violation(s)")]
    IntegrityCheckFailed { violations: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type MartResult<T> = Result<T, MartError>;
