//! Recurring payment detection
//!
//! Expenses are grouped by category and whole-dollar amount. A group whose
//! days of the month all sit close to the group's mean day is flagged as a
//! probable recurring payment; other groups are reported as merely similar.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Write;
use tracing::{debug, error};

use super::outcome::{Analysis, InsufficientData};
use crate::display::report::{double_separator, format_amount, separator, truncate};
use crate::error::{BudgetError, BudgetResult};
use crate::models::Transaction;

/// Thresholds for recurrence detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecurrenceConfig {
    /// Minimum number of transactions, and of expenses, before analysing
    pub min_transactions: usize,
    /// Maximum distance in days from the mean day of month
    pub day_tolerance: f64,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        Self {
            min_transactions: 6,
            day_tolerance: 3.0,
        }
    }
}

/// Expenses sharing a category and rounded amount
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurrenceGroup {
    pub category: String,
    /// Whole-dollar amount the group is keyed on
    pub rounded_amount: i64,
    /// Mean of the members' unrounded amounts
    pub average_amount: f64,
    /// Mean day of month across members
    pub mean_day: f64,
    pub is_recurring: bool,
    /// Members in their original order
    pub members: Vec<Transaction>,
}

/// Result of recurrence detection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecurringReport {
    pub groups: Analysis<Vec<RecurrenceGroup>>,
}

/// Detect recurring expenses with the default thresholds
pub fn detect_recurring(transactions: &[Transaction]) -> RecurringReport {
    detect_recurring_with(transactions, &RecurrenceConfig::default())
}

/// Detect recurring expenses with explicit thresholds
pub fn detect_recurring_with(
    transactions: &[Transaction],
    config: &RecurrenceConfig,
) -> RecurringReport {
    if transactions.len() < config.min_transactions {
        return RecurringReport {
            groups: Analysis::InsufficientData(InsufficientData::TooFewTransactions {
                found: transactions.len(),
                required: config.min_transactions,
            }),
        };
    }

    let expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();
    if expenses.len() < config.min_transactions {
        return RecurringReport {
            groups: Analysis::InsufficientData(InsufficientData::TooFewExpenses {
                found: expenses.len(),
                required: config.min_transactions,
            }),
        };
    }

    // Groups keep the order in which their key was first seen
    let mut index: HashMap<(String, i64), usize> = HashMap::new();
    let mut buckets: Vec<((String, i64), Vec<&Transaction>)> = Vec::new();
    for txn in expenses {
        let key = (
            txn.category_name().to_string(),
            round_half_up(txn.amount_value()),
        );
        match index.get(&key) {
            Some(&i) => buckets[i].1.push(txn),
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![txn]));
            }
        }
    }

    let groups: Vec<RecurrenceGroup> = buckets
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|((category, rounded_amount), members)| {
            build_group(category, rounded_amount, &members, config.day_tolerance)
        })
        .collect();

    debug!(
        groups = groups.len(),
        recurring = groups.iter().filter(|g| g.is_recurring).count(),
        "Detected repeating expenses"
    );

    RecurringReport {
        groups: Analysis::Ready(groups),
    }
}

fn build_group(
    category: String,
    rounded_amount: i64,
    members: &[&Transaction],
    day_tolerance: f64,
) -> RecurrenceGroup {
    let count = members.len() as f64;
    let days: Vec<f64> = members.iter().map(|t| day_of_month(t) as f64).collect();
    let mean_day = days.iter().sum::<f64>() / count;
    let is_recurring = days.iter().all(|d| (d - mean_day).abs() <= day_tolerance);
    let average_amount = members.iter().map(|t| t.amount_value()).sum::<f64>() / count;

    RecurrenceGroup {
        category,
        rounded_amount,
        average_amount,
        mean_day,
        is_recurring,
        members: members.iter().map(|t| (*t).clone()).collect(),
    }
}

/// Day of month of the transaction date, 1 when the date does not parse
fn day_of_month(txn: &Transaction) -> u32 {
    match txn.parsed_date() {
        Some(date) => date.day(),
        None => {
            error!(id = %txn.id, date = %txn.date, "Invalid date in recurrence analysis, using day 1");
            1
        }
    }
}

/// Round to the nearest integer with halves going up (2.5 -> 3, -2.5 -> -2)
fn round_half_up(value: f64) -> i64 {
    // `value - floor` is exact, unlike `value + 0.5` near a half
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor as i64 + 1
    } else {
        floor as i64
    }
}

impl RecurringReport {
    /// Groups flagged as recurring
    pub fn recurring(&self) -> Vec<&RecurrenceGroup> {
        self.groups
            .ready()
            .map(|groups| groups.iter().filter(|g| g.is_recurring).collect())
            .unwrap_or_default()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Recurring Transactions\n");
        output.push_str(&double_separator(60));
        output.push('\n');

        let groups = match &self.groups {
            Analysis::Ready(groups) => groups,
            Analysis::InsufficientData(reason) => {
                output.push_str(&format!("{}\n", reason));
                return output;
            }
        };

        if groups.is_empty() {
            output.push_str("No repeating transactions found.\n");
            return output;
        }

        for group in groups {
            let label = if group.is_recurring {
                "Recurring"
            } else {
                "Similar"
            };
            output.push_str(&format!(
                "\n[{}] {}  ~{}  ({} transactions, around day {:.0})\n",
                label,
                group.category,
                format_amount(group.average_amount, currency),
                group.members.len(),
                group.mean_day
            ));
            output.push_str(&separator(60));
            output.push('\n');
            for txn in &group.members {
                output.push_str(&format!(
                    "  {:<12} {:>12}  {}\n",
                    truncate(&txn.date, 12),
                    txn.amount.as_money().format_with_symbol(currency),
                    truncate(txn.description.as_deref().unwrap_or(""), 30)
                ));
            }
        }

        output
    }

    /// Export every group member to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BudgetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([
            "Category",
            "Average Amount",
            "Status",
            "Transaction ID",
            "Date",
            "Amount",
            "Description",
        ])
        .map_err(|e| BudgetError::Export(e.to_string()))?;

        if let Analysis::Ready(groups) = &self.groups {
            for group in groups {
                let status = if group.is_recurring {
                    "recurring"
                } else {
                    "similar"
                };
                let average = format!("{:.2}", group.average_amount);
                for txn in &group.members {
                    csv.write_record([
                        group.category.as_str(),
                        &average,
                        status,
                        txn.id.as_str(),
                        &txn.date,
                        &format!("{:.2}", txn.amount_value()),
                        txn.description.as_deref().unwrap_or(""),
                    ])
                    .map_err(|e| BudgetError::Export(e.to_string()))?;
                }
            }
        }

        csv.flush()
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        Ok(())
    }
}
