//! Command handlers. Every command starts from a freshly posted dataset.

use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use saldo_core::ledger::LedgerKind;
use saldo_shared::types::UserId;
use saldo_shared::{AppConfig, AppError};
use saldo_store::{EngineError, MemoryStore, PostingEngine};
use serde::Serialize;
use tracing::info;

use crate::dataset::Dataset;
use crate::{Cli, Commands};

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}

/// Prints `value` and exits with success.
fn emit<T: Serialize>(value: Result<T, EngineError>) -> anyhow::Result<ExitCode> {
    print(&value.map_err(AppError::from)?)?;
    Ok(ExitCode::SUCCESS)
}

fn status(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

pub fn run(cli: &Cli, config: AppConfig) -> anyhow::Result<ExitCode> {
    let dataset = Dataset::from_path(&cli.dataset)?;

    let mut engine = PostingEngine::new(MemoryStore::new(), config);
    if let Some(today) = cli.today {
        engine = engine.with_today(today);
    }
    engine.load_chart(dataset.accounts.clone()).map_err(AppError::from)?;

    let user = cli.user.map_or_else(UserId::new, UserId::from_uuid);
    let summary = dataset.post_all(&engine, user);
    let today = cli.today.unwrap_or_else(|| Utc::now().date_naive());

    match &cli.command {
        Commands::Post => {
            print(&summary)?;
            Ok(status(summary.failed.is_empty()))
        }
        Commands::TrialBalance { as_of } => emit(engine.trial_balance(as_of.unwrap_or(today))),
        Commands::BalanceSheet { as_of } => emit(engine.balance_sheet(as_of.unwrap_or(today))),
        Commands::ProfitLoss { from, to } => emit(engine.profit_and_loss(*from, *to)),
        Commands::Verify { sync } => {
            let mut report = engine.verify_integrity().map_err(AppError::from)?;
            if *sync && !report.is_valid() {
                let changed = engine.sync_balances().map_err(AppError::from)?;
                info!(changed, "Re-checking after sync");
                report = engine.verify_integrity().map_err(AppError::from)?;
            }
            print(&report)?;
            Ok(status(report.is_valid()))
        }
        Commands::Reconcile => {
            let comparison = engine.reconcile_ledgers().map_err(AppError::from)?;
            print(&comparison)?;
            Ok(status(comparison.is_consistent()))
        }
        Commands::Close { from, to, preview } => {
            if *preview {
                emit(engine.preview_closing(*from, *to))
            } else {
                emit(engine.close_period(*from, *to, user))
            }
        }
        Commands::Statement { account } => emit(engine.account_statement(account)),
        Commands::Reverse { reference, reason } => {
            let journal = engine
                .journals(LedgerKind::Unified)
                .map_err(AppError::from)?
                .into_iter()
                .find(|j| j.source.reference == *reference && j.is_effective() && j.reversed_by.is_none())
                .ok_or_else(|| AppError::NotFound(format!("No live journal for {reference}")))?;
            emit(engine.reverse(journal.id, reason, user))
        }
    }
}
