//! Service layer for spendcast
//!
//! Business logic between the CLI and the store: validation on write and
//! CSV import.

pub mod import;
pub mod transaction;

pub use import::{ColumnMapping, ImportResult, ImportService};
pub use transaction::{group_by_date, DayGroup, TransactionFilter, TransactionService};
