//! Financial reports over the unified ledger.

use chrono::NaiveDate;
use saldo_core::ledger::{JournalEntry, LedgerKind, SourceType, derive_balances};
use saldo_core::reports::{
    BalanceSheetReport, ProfitLossReport, ReportAccount, ReportError, ReportService,
    TrialBalanceReport,
};

use super::engine::PostingEngine;
use crate::error::EngineError;
use crate::repository::LedgerRepository;

impl<R: LedgerRepository> PostingEngine<R> {
    fn report_accounts<F>(&self, include: F) -> Result<Vec<ReportAccount>, EngineError>
    where
        F: Fn(&JournalEntry) -> bool,
    {
        let chart = self.chart()?;
        let journals = self.repo.journals(LedgerKind::Unified)?;
        let derived = derive_balances(&journals, |c| chart.normal_of(c), include);
        Ok(ReportService::accounts_from(&chart, &derived))
    }

    /// Trial balance as of a date.
    ///
    /// # Errors
    ///
    /// `Store` or `Chart`.
    pub fn trial_balance(&self, as_of: NaiveDate) -> Result<TrialBalanceReport, EngineError> {
        let accounts = self.report_accounts(|j| j.entry_date <= as_of)?;
        Ok(ReportService::generate_trial_balance(
            &accounts,
            as_of,
            self.config.ledger.base_currency,
        ))
    }

    /// Balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// `Store` or `Chart`.
    pub fn balance_sheet(&self, as_of: NaiveDate) -> Result<BalanceSheetReport, EngineError> {
        let accounts = self.report_accounts(|j| j.entry_date <= as_of)?;
        Ok(ReportService::generate_balance_sheet(
            &accounts,
            as_of,
            self.config.ledger.base_currency,
            &self.config.accounts,
        ))
    }

    /// Profit and loss for `[start, end]`, closing journals excluded.
    ///
    /// # Errors
    ///
    /// `Report(InvalidDateRange)` when `end < start`.
    pub fn profit_and_loss(&self, start: NaiveDate, end: NaiveDate) -> Result<ProfitLossReport, EngineError> {
        if end < start {
            return Err(ReportError::InvalidDateRange { start, end }.into());
        }
        let accounts = self.report_accounts(|j| {
            j.entry_date >= start && j.entry_date <= end && j.source.source_type != SourceType::Closing
        })?;
        Ok(ReportService::generate_profit_loss(
            &accounts,
            start,
            end,
            self.config.ledger.base_currency,
        )?)
    }
}
