//! Period closing.

use chrono::NaiveDate;
use saldo_core::fiscal::{
    AccountingPeriod, ClosingPreview, ClosingService, LastClosing, last_closing, validate_new_period,
};
use saldo_core::ledger::{BalancePolicy, LedgerKind, derive_balances};
use saldo_shared::types::{PeriodId, UserId};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::engine::{PostingEngine, PostingReceipt};
use crate::error::EngineError;
use crate::repository::LedgerRepository;

/// Result of closing a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingReceipt {
    /// Recorded period.
    pub period: AccountingPeriod,
    /// Closing journal.
    pub journal: PostingReceipt,
}

impl<R: LedgerRepository> PostingEngine<R> {
    /// Revenue and expense balances a closing of `[start, end]` would zero.
    ///
    /// Balances are cumulative up to `end`, so earlier closings are already
    /// netted out.
    ///
    /// # Errors
    ///
    /// `Closing` when the range is inverted or overlaps a closed period.
    pub fn preview_closing(&self, start: NaiveDate, end: NaiveDate) -> Result<ClosingPreview, EngineError> {
        validate_new_period(start, end, &self.repo.periods()?)?;

        let chart = self.chart()?;
        let journals = self.repo.journals(LedgerKind::Unified)?;
        let balances = derive_balances(&journals, |c| chart.normal_of(c), |j| j.entry_date <= end);
        Ok(ClosingService::preview(&chart, &balances, start, end))
    }

    /// Closes `[start, end]`: posts the closing journal against retained
    /// earnings and records the period, in one batch.
    ///
    /// # Errors
    ///
    /// `Closing` as in [`PostingEngine::preview_closing`], or
    /// `NothingToClose` when no revenue or expense balance remains.
    pub fn close_period(&self, start: NaiveDate, end: NaiveDate, user: UserId) -> Result<ClosingReceipt, EngineError> {
        let preview = self.preview_closing(start, end)?;
        let draft = ClosingService::build(&preview, &self.config.accounts.retained_earnings)?;

        let chart = self.chart()?;
        let pending = self.prepare_entry(&chart, &draft, &BalancePolicy::exact(), user)?;
        let period = AccountingPeriod {
            id: PeriodId::new(),
            start_date: start,
            end_date: end,
            description: format!("Closing {start} to {end}"),
            total_revenue: preview.total_revenue,
            total_expense: preview.total_expense,
            net_income: preview.net_income,
            closing_journal_id: Some(pending.entry.id),
            closed_by: user,
            closed_at: pending.entry.posted_at,
            is_locked: true,
        };

        let numbers = self.repo.commit(self.batch_for(&pending).period(period.clone()))?;

        let journal = self.receipt(&pending.numbered(&numbers));
        info!(
            start = %start,
            end = %end,
            net_income = %period.net_income,
            entry_number = %journal.entry_number,
            "Period closed"
        );
        Ok(ClosingReceipt { period, journal })
    }

    /// Most recent closed period.
    ///
    /// # Errors
    ///
    /// `Store`.
    pub fn last_closing(&self) -> Result<Option<LastClosing>, EngineError> {
        Ok(last_closing(&self.repo.periods()?))
    }
}
