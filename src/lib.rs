//! spendcast - personal budgeting with spending analytics
//!
//! Users record income and expense transactions; the crate derives three
//! views from a user's list:
//!
//! - spending totals per category ([`summarize_by_category`])
//! - a next-month expense forecast from a linear trend over monthly totals
//!   ([`forecast_next_month`])
//! - groups of similar expenses, flagged when they recur on about the same
//!   day of the month ([`detect_recurring`])
//!
//! The analyses are pure functions of `&[Transaction]` and never fail. Where
//! transactions come from is up to the caller: the `storage` module provides
//! the `TransactionStore` capability with a JSON-file and an in-memory
//! implementation.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Transactions and value types
//! - `reports`: The three analyses and their rendering
//! - `storage`: Per-user transaction persistence
//! - `services`: Validation and CSV import
//! - `display`, `cli`: Terminal output and command handlers
//!
//! # Example
//!
//! ```
//! use spendcast::models::Transaction;
//! use spendcast::summarize_by_category;
//!
//! let transactions = vec![
//!     Transaction::income(1000.0, "Salary", "2024-01-01"),
//!     Transaction::expense(50.0, "Other", "2024-01-02"),
//! ];
//! let summary = summarize_by_category(&transactions);
//! assert_eq!(summary.total_spending, 50.0);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{BudgetError, BudgetResult};
pub use reports::{detect_recurring, forecast_next_month, summarize_by_category};
