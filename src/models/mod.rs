//! Core data models for spendcast
//!
//! Transactions, their identifiers, and the small value types the reports
//! are built from.

pub mod category;
pub mod ids;
pub mod money;
pub mod month;
pub mod transaction;

pub use category::{resolve_category, suggested_categories, DEFAULT_CATEGORY};
pub use ids::{TransactionId, UserId};
pub use money::Money;
pub use month::YearMonth;
pub use transaction::{
    parse_calendar_date, Amount, DraftValidationError, Transaction, TransactionDraft,
    TransactionType,
};
