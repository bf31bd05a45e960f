//! Spending by category
//!
//! Sums expense amounts per category label. Income is ignored, a missing
//! category counts as "Other" and an amount that does not parse adds 0.

use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use tracing::debug;

use crate::display::report::{format_amount, format_bar, format_percentage, separator, truncate};
use crate::error::{BudgetError, BudgetResult};
use crate::models::Transaction;

const BAR_WIDTH: usize = 20;

/// Expense totals per category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorySummary {
    /// Total per category label, unordered
    pub category_totals: HashMap<String, f64>,
    /// Sum of every expense amount
    pub total_spending: f64,
}

/// One row of the summary in display order
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    /// Share of total spending, 0-100
    pub percentage: f64,
}

/// Sum expenses per category
pub fn summarize_by_category(transactions: &[Transaction]) -> CategorySummary {
    let mut summary = CategorySummary::default();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        let amount = txn.amount_value();
        *summary
            .category_totals
            .entry(txn.category_name().to_string())
            .or_insert(0.0) += amount;
        summary.total_spending += amount;
    }

    debug!(
        categories = summary.category_totals.len(),
        total = summary.total_spending,
        "summarized spending by category"
    );
    summary
}

impl CategorySummary {
    pub fn is_empty(&self) -> bool {
        self.category_totals.is_empty()
    }

    /// Total for one category, 0 when absent
    pub fn total_for(&self, category: &str) -> f64 {
        self.category_totals.get(category).copied().unwrap_or(0.0)
    }

    /// Categories ordered by total, largest first, ties by name
    pub fn sorted_shares(&self) -> Vec<CategoryShare> {
        let mut shares: Vec<CategoryShare> = self
            .category_totals
            .iter()
            .map(|(category, &total)| CategoryShare {
                category: category.clone(),
                total,
                percentage: percentage_of(total, self.total_spending),
            })
            .collect();

        shares.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });
        shares
    }

    /// Format the summary for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Spending by Category\n");
        output.push_str(&"=".repeat(64));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No expenses recorded.\n");
            return output;
        }

        output.push_str(&format!(
            "{:<20} {:>12} {:>7}  {}\n",
            "Category", "Amount", "%", ""
        ));
        output.push_str(&separator(64));
        output.push('\n');

        let shares = self.sorted_shares();
        let max = shares.first().map(|s| s.total).unwrap_or(0.0);
        for share in &shares {
            output.push_str(&format!(
                "{:<20} {:>12} {:>7}  {}\n",
                truncate(&share.category, 20),
                format_amount(share.total, currency),
                format_percentage(share.percentage),
                format_bar(share.total, max, BAR_WIDTH)
            ));
        }

        output.push_str(&separator(64));
        output.push('\n');
        output.push_str(&format!(
            "{:<20} {:>12}\n",
            "TOTAL SPENDING",
            format_amount(self.total_spending, currency)
        ));

        output
    }

    /// Export the summary to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BudgetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Category", "Amount", "Percentage"])
            .map_err(|e| BudgetError::Export(e.to_string()))?;

        for share in self.sorted_shares() {
            csv.write_record([
                share.category.as_str(),
                &format!("{:.2}", share.total),
                &format!("{:.2}", share.percentage),
            ])
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        }

        csv.write_record(["TOTAL", &format!("{:.2}", self.total_spending), "100.00"])
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        csv.flush()
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        Ok(())
    }
}

fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
