//! Error types for globalign

use thiserror::Error;

/// Main error type for globalign operations
#[derive(Error, Debug)]
pub enum GlobalignError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Matrix format error: {0}")]
    Format(String),

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Malformed sequence source: {0}")]
    MalformedSequence(String),
}

/// Result type alias for globalign operations
pub type GlobalignResult<T> = Result<T, GlobalignError>;
