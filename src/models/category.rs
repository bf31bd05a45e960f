//! Category labels
//!
//! Categories are free-form strings on each transaction. The suggested sets
//! below are what the entry prompts offer; anything else is accepted too.

use super::transaction::TransactionType;

/// Label used when a transaction has no category
pub const DEFAULT_CATEGORY: &str = "Other";

const EXPENSE_CATEGORIES: [&str; 6] = [
    "Groceries",
    "Transport",
    "Entertainment",
    "Rent",
    "Utilities",
    DEFAULT_CATEGORY,
];

const INCOME_CATEGORIES: [&str; 6] = [
    "Salary",
    "Freelance",
    "Investments",
    "Gifts",
    "Refunds",
    DEFAULT_CATEGORY,
];

/// Suggested category labels for a transaction type
pub fn suggested_categories(kind: TransactionType) -> &'static [&'static str] {
    match kind {
        TransactionType::Expense => &EXPENSE_CATEGORIES,
        TransactionType::Income => &INCOME_CATEGORIES,
    }
}

/// Resolve an optional category to its label, falling back to "Other"
pub fn resolve_category(category: Option<&str>) -> &str {
    match category {
        Some(c) if !c.is_empty() => c,
        _ => DEFAULT_CATEGORY,
    }
}

/// Case-insensitive match against the suggested set, returning the canonical spelling
pub fn canonical_category(kind: TransactionType, input: &str) -> Option<&'static str> {
    let input = input.trim();
    suggested_categories(kind)
        .iter()
        .copied()
        .find(|c| c.eq_ignore_ascii_case(input))
}
