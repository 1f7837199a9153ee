//! Ledger query error types.

use budgetline_shared::AppError;
use thiserror::Error;

/// Errors raised by a ledger query service.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The backing store could not be reached or failed mid-query.
    #[error("Ledger backend unavailable: {0}")]
    Unavailable(String),

    /// The query was rejected by the backend.
    #[error("Invalid ledger query: {0}")]
    InvalidQuery(String),

    /// A summed amount does not fit in a decimal.
    #[error("Ledger amount overflow")]
    AmountOverflow,
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Ledger(err.to_string())
    }
}
