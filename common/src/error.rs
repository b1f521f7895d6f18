//! Error types for currency and pair parsing.

use thiserror::Error;

/// Errors raised while building currency codes, pairs and rate entries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurrencyError {
    /// Currency code was empty after trimming.
    #[error("Currency code cannot be empty")]
    EmptyCode,

    /// Currency code contained something other than ASCII letters or digits,
    /// or was too long.
    #[error("Invalid currency code: {0}")]
    InvalidCode(String),

    /// Pair string was not of the form `BASE-TARGET`.
    #[error("Invalid currency pair: {0}")]
    InvalidPair(String),

    /// Rate was zero, negative, or not representable.
    #[error("Invalid rate: {0}")]
    InvalidRate(String),
}

/// Result type alias for currency operations.
pub type Result<T> = std::result::Result<T, CurrencyError>;
