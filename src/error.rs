use thiserror::Error as ThisError;

use crate::services::ingestion::IngestError;

/// Crate-wide boundary error.
///
/// Domain-specific failures keep their own types (`ParseError`,
/// `WriteError`, `IngestError`) close to the components that produce them;
/// this enum is what the CLI and HTTP layers ultimately report.
#[derive(ThisError, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Io(format!("CSV error: {}", err))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
