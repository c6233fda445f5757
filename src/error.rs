//! Error types for the quizdda crate

use thiserror::Error;

use crate::types::DifficultyLevel;

/// Main error type for the quizdda crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("no questions available for difficulty {difficulty:?}")]
    EmptyQuestionPool { difficulty: DifficultyLevel },

    #[error("session already finished")]
    SessionFinished,

    #[error("turn out of order: {expected}")]
    TurnOrder { expected: &'static str },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unknown action discriminant {value} (expected 0, 1 or 2)")]
    UnknownAction { value: u8 },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
