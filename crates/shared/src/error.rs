//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Ledger query service error.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Dataset could not be read or decoded.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Internal error, such as an amount overflowing during computation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns a stable machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Ledger(_) => "LEDGER_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Dataset(_) => "DATASET_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the error was caused by invalid input rather than
    /// by the environment.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Dataset(err.to_string())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
