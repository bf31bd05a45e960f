use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spendcast::cli::{
    handle_import_command, handle_report_command, handle_transaction_command, ReportCommands,
    TransactionCommands,
};
use spendcast::config::{paths::SpendcastPaths, settings::Settings};
use spendcast::models::UserId;
use spendcast::services::TransactionService;
use spendcast::storage::JsonTransactionStore;

#[derive(Parser)]
#[command(
    name = "spendcast",
    version,
    about = "Personal budgeting: log transactions, see where money goes, forecast next month",
    long_about = "spendcast keeps a per-user list of income and expenses and derives \
                  three views from it: spending by category, a linear-trend forecast \
                  of next month's expenses, and detection of recurring payments."
)]
struct Cli {
    /// User whose transactions to use
    #[arg(short, long, global = true, env = "SPENDCAST_USER")]
    user: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Spending, forecast and recurrence reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Import transactions from a CSV file
    Import {
        /// Path to CSV file (header: date,amount[,type,category,description])
        file: PathBuf,
    },

    /// Show configuration and paths
    Config {
        /// Save a default user for when --user is not given
        #[arg(long)]
        default_user: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (warn)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();

    let paths = SpendcastPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    debug!(base_dir = %paths.base_dir().display(), "Resolved paths");

    if let Commands::Config { default_user } = &cli.command {
        if let Some(name) = default_user {
            settings.default_user = Some(UserId::parse(name)?);
            settings.save(&paths)?;
            println!("Default user set to '{}'", name.trim());
            println!();
        }
        print_config(&paths, &settings, cli.user.as_deref());
        return Ok(());
    }

    let user = resolve_user(cli.user.as_deref(), &settings)?;
    let store = JsonTransactionStore::new(paths.clone());
    let service = TransactionService::new(&store);

    match cli.command {
        Commands::Transaction(cmd) => handle_transaction_command(&service, &user, &settings, cmd)?,
        Commands::Report(cmd) => handle_report_command(&service, &user, &settings, cmd)?,
        Commands::Import { file } => handle_import_command(&service, &user, &file)?,
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// `--user` / `SPENDCAST_USER` first, then the saved default
fn resolve_user(arg: Option<&str>, settings: &Settings) -> Result<UserId> {
    match arg {
        Some(name) => Ok(UserId::parse(name)?),
        None => settings.default_user.clone().context(
            "No user selected. Pass --user, set SPENDCAST_USER, \
             or run 'spendcast config --default-user NAME'",
        ),
    }
}

fn print_config(paths: &SpendcastPaths, settings: &Settings, user: Option<&str>) {
    println!("spendcast Configuration");
    println!("=======================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Data directory:   {}", paths.data_dir().display());
    println!("Settings file:    {}", paths.settings_file().display());
    println!();
    println!("Settings:");
    println!("  Currency symbol: {}", settings.currency_symbol);
    match &settings.default_user {
        Some(default_user) => println!("  Default user:    {}", default_user),
        None => println!("  Default user:    (none)"),
    }
    if let Some(user) = user {
        println!("  Active user:     {}", user.trim());
    }
    println!(
        "  Recurrence:      at least {} transactions, within {} days of the mean",
        settings.recurrence.min_transactions, settings.recurrence.day_tolerance
    );
}
