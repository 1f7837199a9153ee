//! Core business logic for Budgetline.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `budget` - Budget posts, budgets, and progress computation
//! - `ledger` - Ledger query interface and an in-memory implementation
//! - `reports` - Financial report trees and balance roll-up
//! - `clock` - Injectable "today"

pub mod budget;
pub mod clock;
pub mod ledger;
pub mod reports;
