//! Saldo command line.
//!
//! Loads a chart of accounts and a batch of documents from a JSON dataset
//! into an in-memory ledger, then posts, reports, verifies or closes.
//!
//! Usage: saldo --dataset demos/dataset.json trial-balance

mod commands;
mod dataset;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use saldo_shared::{AppConfig, AppError};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "saldo")]
#[command(about = "Saldo - double-entry posting and balance engine", long_about = None)]
struct Cli {
    /// Dataset with accounts and documents
    #[arg(short, long, default_value = "demos/dataset.json")]
    dataset: PathBuf,

    /// Directory holding default.toml and {RUN_MODE}.toml
    #[arg(long, default_value = "config")]
    config_dir: String,

    /// User recorded on every journal
    #[arg(long, env = "SALDO_USER")]
    user: Option<Uuid>,

    /// Date treated as today for future-date checks and reversals
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post every document in the dataset and list the outcome
    Post,

    /// Trial balance as of a date
    TrialBalance {
        /// Report date, defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Balance sheet as of a date
    BalanceSheet {
        /// Report date, defaults to today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },

    /// Profit and loss for a date range
    ProfitLoss {
        /// First day of the range
        #[arg(long)]
        from: NaiveDate,
        /// Last day of the range
        #[arg(long)]
        to: NaiveDate,
    },

    /// Compare cached balances with the ledger
    Verify {
        /// Rewrite cached balances when they disagree
        #[arg(long)]
        sync: bool,
    },

    /// Compare the legacy ledger with the unified one
    Reconcile,

    /// Close an accounting period into retained earnings
    Close {
        /// First day of the period
        #[arg(long)]
        from: NaiveDate,
        /// Last day of the period
        #[arg(long)]
        to: NaiveDate,
        /// Show the closing entries without posting them
        #[arg(long)]
        preview: bool,
    },

    /// Running balance of one account
    Statement {
        /// Account code
        #[arg(long)]
        account: String,
    },

    /// Reverse the journal posted for a document
    Reverse {
        /// Document reference, e.g. SALE-SO-0001
        #[arg(long)]
        reference: String,
        /// Why the journal is reversed
        #[arg(long)]
        reason: String,
    },
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "saldo=info,saldo_store=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn load_config(dir: &str) -> Result<AppConfig, AppError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
    Ok(AppConfig::load_from(dir, &run_mode)?)
}

fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let result = load_config(&cli.config_dir)
        .map_err(anyhow::Error::from)
        .and_then(|config| commands::run(&cli, config));

    match result {
        Ok(code) => code,
        Err(err) => {
            let exit = err.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            let code = err
                .downcast_ref::<AppError>()
                .map_or("INTERNAL_ERROR", AppError::error_code);
            error!(code, exit, "{err:#}");
            ExitCode::from(exit)
        }
    }
}
