use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation failures for scalar market values
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    #[error("Value must be non-negative")]
    MustBeNonNegative,

    #[error("Value must be finite")]
    MustBeFinite,
}

impl From<ValidationError> for String {
    fn from(error: ValidationError) -> Self {
        error.to_string()
    }
}

/// Failures raised by the analysis pipeline for a single symbol.
///
/// Every variant is recoverable at the single-symbol boundary: the screener
/// records it and moves on, a direct analysis call reports it to its caller.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", content = "message")]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bar dates not strictly increasing at index {index}")]
    NonIncreasingDates { index: usize },

    #[error("Provider failed for {symbol}: {reason}")]
    ProviderFailure { symbol: String, reason: String },

    #[error("Analysis task aborted: {0}")]
    TaskAborted(String),
}
