//! Reports over a user's transactions
//!
//! Three independent analyses: spending by category, a next-month expense
//! forecast and recurring payment detection. Each is a pure function of the
//! transaction list and never fails.

pub mod category_summary;
pub mod forecast;
pub mod outcome;
pub mod recurring;
pub mod regression;

pub use category_summary::{summarize_by_category, CategoryShare, CategorySummary};
pub use forecast::{
    fill_missing_months, forecast_next_month, group_by_month, ForecastReport, ForecastResult,
    MonthBucket,
};
pub use outcome::{Analysis, InsufficientData};
pub use recurring::{
    detect_recurring, detect_recurring_with, RecurrenceConfig, RecurrenceGroup, RecurringReport,
};
pub use regression::{fit_linear, LinearFit};
