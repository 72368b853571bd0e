//! Error types for the mafia-odds crate

use thiserror::Error;

/// Main error type for the mafia-odds crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("transition probabilities from {state} sum to {total}, expected 1")]
    ProbabilityLeak { state: String, total: String },

    #[error("state {state} is unreachable: {reason}")]
    UnreachableState { state: String, reason: String },

    #[error("evaluation exceeded the limit of {limit} distinct states")]
    StateLimitExceeded { limit: usize },

    #[error("state {state} was re-entered while its probability was being computed")]
    CycleDetected { state: String },

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

    #[error("progress bar template error: {message}")]
    ProgressBarTemplate { message: String },
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
