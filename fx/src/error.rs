//! Rate engine error types.

use ratedesk_common::{CurrencyError, CurrencyPair};
use thiserror::Error;

/// Errors surfaced by the rate store and resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// Malformed or missing parameters, or a rate that is not a positive number.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No direct or inverse entry for the requested pair, or a mutation
    /// targeting a pair that is not stored.
    #[error("Rate not found for {0}")]
    NotFound(CurrencyPair),

    /// Storage backend failure. The detail is for logs only.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RateError {
    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RateError::InvalidInput(_) => "INVALID_INPUT",
            RateError::NotFound(_) => "NOT_FOUND",
            RateError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message safe to return to a caller.
    pub fn public_message(&self) -> String {
        match self {
            RateError::Internal(_) => "Internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<CurrencyError> for RateError {
    fn from(e: CurrencyError) -> Self {
        RateError::InvalidInput(e.to_string())
    }
}

/// Result type for rate operations.
pub type RateResult<T> = Result<T, RateError>;
