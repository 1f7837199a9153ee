//! Budget error types.

use budgetline_shared::types::{BudgetLineId, BudgetPostId, DateRange};
use budgetline_shared::AppError;
use chrono::NaiveDate;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// A budget post must reference at least one account.
    #[error("The budget post must have at least one account")]
    EmptyAccounts,

    /// A required name is blank.
    #[error("Name cannot be empty")]
    EmptyName,

    /// A budget line needs a budget post, an analytic account, or both.
    #[error("A budget line must have a budget post or an analytic account")]
    MissingAnalyticOrPost,

    /// The line starts outside the budget period.
    #[error("Budget line start date {date_from} is outside the budget period {budget}")]
    LineStartOutsideBudget {
        /// Line start date.
        date_from: NaiveDate,
        /// Budget period.
        budget: DateRange,
    },

    /// The line ends outside the budget period.
    #[error("Budget line end date {date_to} is outside the budget period {budget}")]
    LineEndOutsideBudget {
        /// Line end date.
        date_to: NaiveDate,
        /// Budget period.
        budget: DateRange,
    },

    /// Budget line not found.
    #[error("Budget line not found: {0}")]
    BudgetLineNotFound(BudgetLineId),

    /// Budget post not found.
    #[error("Budget post not found: {0}")]
    BudgetPostNotFound(BudgetPostId),

    /// A summed amount does not fit in a decimal.
    #[error("Budget amount overflow")]
    AmountOverflow,

    /// The ledger query service failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::BudgetLineNotFound(_) | BudgetError::BudgetPostNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            BudgetError::AmountOverflow => Self::Internal(err.to_string()),
            BudgetError::Ledger(inner) => Self::Ledger(inner.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}
