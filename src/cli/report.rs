//! CLI commands for reports

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::UserId;
use crate::reports::{detect_recurring_with, forecast_next_month, summarize_by_category};
use crate::services::TransactionService;

/// Report subcommands
#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Expense totals per category
    #[command(alias = "spending")]
    Categories {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forecast next month's expenses from the monthly trend
    Forecast {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Find repeating and probably recurring expenses
    #[command(alias = "recurrence")]
    Recurring {
        /// Export to CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Handle report commands
pub fn handle_report_command(
    service: &TransactionService,
    user: &UserId,
    settings: &Settings,
    cmd: ReportCommands,
) -> BudgetResult<()> {
    let transactions = service.all(user)?;

    match cmd {
        ReportCommands::Categories { output } => {
            let report = summarize_by_category(&transactions);
            match output {
                Some(path) => {
                    export_to(&path, |w| report.export_csv(w))?;
                    println!("Category report exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal(&settings.currency_symbol)),
            }
        }
        ReportCommands::Forecast { output } => {
            let report = forecast_next_month(&transactions);
            match output {
                Some(path) => {
                    export_to(&path, |w| report.export_csv(w))?;
                    println!("Forecast exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal(&settings.currency_symbol)),
            }
        }
        ReportCommands::Recurring { output } => {
            let report = detect_recurring_with(&transactions, &settings.recurrence);
            match output {
                Some(path) => {
                    export_to(&path, |w| report.export_csv(w))?;
                    println!("Recurring transactions exported to: {}", path.display());
                }
                None => println!("{}", report.format_terminal(&settings.currency_symbol)),
            }
        }
    }

    Ok(())
}

fn export_to(
    path: &Path,
    export: impl FnOnce(&mut BufWriter<File>) -> BudgetResult<()>,
) -> BudgetResult<()> {
    let file = File::create(path).map_err(|e| {
        BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export(&mut writer)?;
    writer
        .flush()
        .map_err(|e| BudgetError::Export(format!("Failed to write {}: {}", path.display(), e)))
}
