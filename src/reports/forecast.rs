//! Next-month expense forecast
//!
//! Expenses are bucketed by calendar month, gaps between the first and last
//! month are filled with zero totals, and a least-squares line through the
//! monthly totals is extended one month ahead.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::{debug, warn};

use super::outcome::{Analysis, InsufficientData};
use super::regression::fit_linear;
use crate::display::report::{double_separator, format_amount, format_bar, separator};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Transaction, YearMonth};

const BAR_WIDTH: usize = 24;

/// Total expenses in one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthBucket {
    pub month: YearMonth,
    pub total: f64,
}

/// A fitted forecast for the month after the history
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastResult {
    pub target_month: YearMonth,
    /// Never negative
    pub predicted_amount: f64,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Monthly history plus the forecast derived from it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastReport {
    /// Contiguous ascending months, zero-filled
    pub monthly_history: Vec<MonthBucket>,
    pub forecast: Analysis<ForecastResult>,
}

/// Sum expenses per calendar month, ascending
///
/// Expenses whose date does not parse are skipped.
pub fn group_by_month(transactions: &[Transaction]) -> Vec<MonthBucket> {
    let mut totals: BTreeMap<YearMonth, f64> = BTreeMap::new();

    for txn in transactions.iter().filter(|t| t.is_expense()) {
        match txn.parsed_date() {
            Some(date) => {
                *totals.entry(YearMonth::from_date(date)).or_insert(0.0) += txn.amount_value();
            }
            None => {
                warn!(id = %txn.id, date = %txn.date, "Skipping expense with invalid date");
            }
        }
    }

    totals
        .into_iter()
        .map(|(month, total)| MonthBucket { month, total })
        .collect()
}

/// Insert zero buckets for every month missing between the first and last
///
/// Expects ascending input. Fewer than two buckets are returned unchanged.
pub fn fill_missing_months(buckets: Vec<MonthBucket>) -> Vec<MonthBucket> {
    if buckets.len() < 2 {
        return buckets;
    }

    let (first, last) = match (buckets.first(), buckets.last()) {
        (Some(first), Some(last)) => (first.month, last.month),
        _ => return buckets,
    };

    let mut filled = Vec::with_capacity(first.months_until(&last).max(0) as usize + 1);
    let mut existing = buckets.into_iter().peekable();
    let mut month = first;
    while month <= last {
        match existing.peek() {
            Some(bucket) if bucket.month == month => {
                filled.push(*bucket);
                existing.next();
            }
            _ => filled.push(MonthBucket { month, total: 0.0 }),
        }
        month = month.next();
    }
    filled
}

/// Forecast next month's expenses from the transaction history
pub fn forecast_next_month(transactions: &[Transaction]) -> ForecastReport {
    if transactions.is_empty() {
        return ForecastReport {
            monthly_history: Vec::new(),
            forecast: Analysis::InsufficientData(InsufficientData::NoTransactions),
        };
    }

    let history = fill_missing_months(group_by_month(transactions));
    let series: Vec<f64> = history.iter().map(|b| b.total).collect();

    let forecast = match (fit_linear(&series), history.last()) {
        (Some(fit), Some(last)) => {
            let result = ForecastResult {
                target_month: last.month.next(),
                predicted_amount: fit.predict(series.len() as f64).max(0.0),
                slope: fit.slope,
                intercept: fit.intercept,
                r_squared: fit.r_squared,
            };
            debug!(
                months = history.len(),
                target = %result.target_month,
                predicted = result.predicted_amount,
                r_squared = result.r_squared,
                "Computed expense forecast"
            );
            Analysis::Ready(result)
        }
        _ => Analysis::InsufficientData(InsufficientData::TooFewMonths {
            found: history.len(),
        }),
    };

    ForecastReport {
        monthly_history: history,
        forecast,
    }
}

impl ForecastReport {
    /// Format the report for terminal display, amounts prefixed with `currency`
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();

        output.push_str("Expense Forecast\n");
        output.push_str(&double_separator(60));
        output.push('\n');

        if !self.monthly_history.is_empty() {
            output.push_str("Monthly expenses:\n");
            let max = self
                .monthly_history
                .iter()
                .map(|b| b.total)
                .fold(0.0, f64::max);
            for bucket in &self.monthly_history {
                output.push_str(&format!(
                    "  {:<16} {:>12}  {}\n",
                    bucket.month.label(),
                    format_amount(bucket.total, currency),
                    format_bar(bucket.total, max, BAR_WIDTH)
                ));
            }
            output.push_str(&separator(60));
            output.push('\n');
        }

        match &self.forecast {
            Analysis::Ready(result) => {
                output.push_str(&format!(
                    "Forecast for {}: {}\n",
                    result.target_month.label(),
                    format_amount(result.predicted_amount, currency)
                ));
                output.push_str(&format!(
                    "Trend: y = {:.2}x + {:.2}\n",
                    result.slope, result.intercept
                ));
                output.push_str(&format!(
                    "Confidence (R²): {:.1}%\n",
                    result.r_squared * 100.0
                ));
            }
            Analysis::InsufficientData(reason) => {
                output.push_str(&format!("{}\n", reason));
            }
        }

        output
    }

    /// Export history and forecast to CSV format
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> BudgetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["Month", "Amount", "Kind"])
            .map_err(|e| BudgetError::Export(e.to_string()))?;

        for bucket in &self.monthly_history {
            csv.write_record([
                bucket.month.to_string().as_str(),
                &format!("{:.2}", bucket.total),
                "actual",
            ])
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        }

        if let Analysis::Ready(result) = &self.forecast {
            csv.write_record([
                result.target_month.to_string().as_str(),
                &format!("{:.2}", result.predicted_amount),
                "forecast",
            ])
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        }

        csv.flush()
            .map_err(|e| BudgetError::Export(e.to_string()))?;
        Ok(())
    }
}
