//! Display formatting for terminal output

pub mod report;
pub mod transaction;

pub use transaction::{
    format_category_hint, format_transaction_details, format_transaction_list,
    format_transaction_row,
};
