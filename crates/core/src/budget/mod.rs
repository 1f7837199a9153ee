//! Budget posts, budgets, and budget progress tracking.

pub mod error;
pub mod progress;
pub mod service;
pub mod types;


pub use error::BudgetError;
pub use progress::{
    aggregate, group_by_post, is_above_budget, percentage, theoretical_amount,
    BudgetProgressCalculator,
};
pub use service::BudgetService;
pub use types::{
    AnalyticAccount, Budget, BudgetLine, BudgetLineInput, BudgetLineProgress, BudgetPost,
    BudgetState, CreateBudgetInput, CreateBudgetPostInput, GroupProgress, UpdateBudgetPostInput,
};
