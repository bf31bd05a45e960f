//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer and reports.

pub mod import;
pub mod report;
pub mod transaction;

pub use import::handle_import_command;
pub use report::{handle_report_command, ReportCommands};
pub use transaction::{handle_transaction_command, KindArg, TransactionCommands};
