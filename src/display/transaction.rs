//! Transaction display formatting

use super::report::truncate;
use crate::models::{suggested_categories, Transaction, TransactionType};
use crate::services::group_by_date;

/// One register line: short ID, category, signed amount, description
pub fn format_transaction_row(txn: &Transaction, currency: &str) -> String {
    let money = txn.amount.as_money().format_with_symbol(currency);
    let amount = match txn.kind {
        TransactionType::Income => format!("+{}", money),
        TransactionType::Expense => format!("-{}", money),
    };

    format!(
        "  {:<8} {:<16} {:>12}  {}",
        txn.id.short(),
        truncate(txn.category_name(), 16),
        amount,
        truncate(txn.description.as_deref().unwrap_or(""), 30)
    )
}

/// Transactions grouped under day headings, newest day first
pub fn format_transaction_list(transactions: &[Transaction], currency: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    for group in group_by_date(transactions) {
        output.push_str(&group.label());
        output.push('\n');
        for txn in &group.transactions {
            output.push_str(&format_transaction_row(txn, currency));
            output.push('\n');
        }
    }
    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Type:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", txn.date));
    output.push_str(&format!(
        "Amount:      {}\n",
        txn.amount.as_money().format_with_symbol(currency)
    ));
    output.push_str(&format!("Category:    {}\n", txn.category_name()));

    if let Some(description) = &txn.description {
        output.push_str(&format!("Description: {}\n", description));
    }
    if let Some(created_at) = txn.created_at {
        output.push_str(&format!(
            "Created:     {}\n",
            created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }

    output
}

/// Comma-separated list of suggested categories for a type
pub fn format_category_hint(kind: TransactionType) -> String {
    suggested_categories(kind).join(", ")
}
