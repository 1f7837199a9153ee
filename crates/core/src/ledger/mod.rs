//! Ledger access for budget and report computations.
//!
//! - `entry` - Journal, analytic and drill-down rows
//! - `balance` - Per-account debit/credit totals
//! - `query` - The query service interface consumed by budgets
//! - `memory` - In-memory query service implementation

pub mod balance;
pub mod entry;
pub mod error;
pub mod memory;
pub mod query;

pub use balance::AccountBalance;
pub use entry::{Account, AnalyticLine, LedgerEntryLine, MoveLine};
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use query::{AmountQuery, AmountSource, LedgerQuery};
