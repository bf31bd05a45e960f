//! Transaction CLI commands

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};

use crate::config::Settings;
use crate::display::transaction::{
    format_category_hint, format_transaction_details, format_transaction_list,
};
use crate::error::{BudgetError, BudgetResult};
use crate::models::category::canonical_category;
use crate::models::{Amount, TransactionDraft, TransactionType, UserId};
use crate::services::{TransactionFilter, TransactionService};

/// Transaction type as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Expense,
    Income,
}

impl From<KindArg> for TransactionType {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Expense => TransactionType::Expense,
            KindArg::Income => TransactionType::Income,
        }
    }
}

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Add a new transaction
    Add {
        /// Amount as a positive number (e.g., "12.50")
        amount: String,
        /// Expense or income
        #[arg(short = 't', long = "type", value_enum, default_value = "expense")]
        kind: KindArg,
        /// Category (defaults to "Other")
        #[arg(short, long)]
        category: Option<String>,
        /// Transaction date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List transactions grouped by day
    List {
        /// Only expenses or only income
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<KindArg>,
        /// Filter by category
        #[arg(short = 'C', long)]
        category: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
    },
    /// Show transaction details
    Show {
        /// Transaction ID or unique prefix
        id: String,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID or unique prefix
        id: String,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New type
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<KindArg>,
        /// New category ("none" clears it)
        #[arg(short, long)]
        category: Option<String>,
        /// New date (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// New description ("" clears it)
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID or unique prefix
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
    /// Show the suggested categories
    Categories {
        /// Only one transaction type
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<KindArg>,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    service: &TransactionService,
    user: &UserId,
    settings: &Settings,
    cmd: TransactionCommands,
) -> BudgetResult<()> {
    let currency = settings.currency_symbol.as_str();

    match cmd {
        TransactionCommands::Add {
            amount,
            kind,
            category,
            date,
            description,
        } => {
            let date = date.unwrap_or_else(|| {
                chrono::Local::now()
                    .date_naive()
                    .format("%Y-%m-%d")
                    .to_string()
            });

            let kind = TransactionType::from(kind);
            let mut draft = TransactionDraft::new(Amount::from(amount), kind, date);
            draft.category = category.map(|c| spell_category(kind, c));
            draft.description = description;

            let txn = service.create(user, draft)?;

            println!("Created transaction:");
            println!("  ID:       {}", txn.id);
            println!("  Type:     {}", txn.kind);
            println!("  Date:     {}", txn.date);
            println!("  Amount:   {}", txn.amount.as_money().format_with_symbol(currency));
            println!("  Category: {}", txn.category_name());
        }

        TransactionCommands::List {
            kind,
            category,
            from,
            to,
            limit,
        } => {
            let mut filter = TransactionFilter::new()
                .limit(limit)
                .date_range(parse_date_arg(from)?, parse_date_arg(to)?);
            if let Some(kind) = kind {
                filter = filter.kind(kind.into());
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }

            let transactions = service.list(user, &filter)?;
            print!("{}", format_transaction_list(&transactions, currency));
            println!("\nShowing {} transactions", transactions.len());
        }

        TransactionCommands::Show { id } => {
            let txn = service.find(user, &id)?;
            print!("{}", format_transaction_details(&txn, currency));
        }

        TransactionCommands::Edit {
            id,
            amount,
            kind,
            category,
            date,
            description,
        } => {
            let txn = service.find(user, &id)?;
            let mut draft = txn.to_draft();

            if let Some(amount) = amount {
                draft.amount = Amount::from(amount);
            }
            if let Some(kind) = kind {
                draft.kind = kind.into();
            }
            if let Some(category) = category {
                draft.category = if category.eq_ignore_ascii_case("none") {
                    None
                } else {
                    Some(spell_category(draft.kind, category))
                };
            }
            if let Some(date) = date {
                draft.date = date;
            }
            if let Some(description) = description {
                draft.description = Some(description);
            }

            let updated = service.update(user, &txn.id, draft)?;
            println!("Updated transaction: {}", updated.id);
            println!("  Date:     {}", updated.date);
            println!(
                "  Amount:   {}",
                updated.amount.as_money().format_with_symbol(currency)
            );
            println!("  Category: {}", updated.category_name());
        }

        TransactionCommands::Delete { id, force } => {
            let txn = service.find(user, &id)?;

            if !force {
                println!("About to delete transaction:");
                print!("{}", format_transaction_details(&txn, currency));
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            service.delete(user, &txn.id)?;
            println!(
                "Deleted transaction: {} ({})",
                txn.id,
                txn.summary(currency)
            );
        }

        TransactionCommands::Categories { kind } => {
            let kinds = match kind {
                Some(kind) => vec![TransactionType::from(kind)],
                None => vec![TransactionType::Expense, TransactionType::Income],
            };
            for kind in kinds {
                println!("{}: {}", kind, format_category_hint(kind));
            }
        }
    }

    Ok(())
}

/// Use the suggested spelling when the input matches a suggested category
fn spell_category(kind: TransactionType, input: String) -> String {
    match canonical_category(kind, &input) {
        Some(canonical) => canonical.to_string(),
        None => input,
    }
}

fn parse_date_arg(value: Option<String>) -> BudgetResult<Option<NaiveDate>> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                BudgetError::Validation(format!("Invalid date format: '{}'. Use YYYY-MM-DD", s))
            })
        })
        .transpose()
}
