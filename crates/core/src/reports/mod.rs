//! Financial report trees.
//!
//! This module provides pure business logic for hierarchical financial
//! reports:
//! - The report node tree with maintained levels
//! - Ordered linearization for sequential rendering
//! - Balance roll-up and report line generation

pub mod error;
pub mod service;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use service::ReportService;
pub use tree::FinancialReportTree;
pub use types::*;
