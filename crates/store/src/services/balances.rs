//! Derived balances, cache sync, integrity and ledger reconciliation.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use saldo_core::ledger::{AccountBalance, LedgerKind, StatementLine, account_statement, derive_balances};
use saldo_core::reconciliation::{
    IntegrityReport, LedgerComparison, compare_ledgers, find_double_postings,
    find_unbalanced_journals, verify_cached_balances,
};
use saldo_core::reports::ReportError;
use tracing::{error, info, warn};

use super::engine::PostingEngine;
use crate::error::EngineError;
use crate::repository::{LedgerRepository, PostingBatch};

impl<R: LedgerRepository> PostingEngine<R> {
    /// Leaf balances derived from the unified ledger.
    ///
    /// # Errors
    ///
    /// `Store` or `Chart`.
    pub fn derived_balances(&self) -> Result<BTreeMap<String, AccountBalance>, EngineError> {
        let chart = self.chart()?;
        let journals = self.repo.journals(LedgerKind::Unified)?;
        Ok(derive_balances(&journals, |c| chart.normal_of(c), |_| true))
    }

    /// Rewrites every cached balance from the unified ledger, headers included,
    /// in one batch.
    ///
    /// Returns the number of accounts whose cached balance changed.
    ///
    /// # Errors
    ///
    /// `Store` or `Chart`.
    pub fn sync_balances(&self) -> Result<usize, EngineError> {
        let chart = self.chart()?;
        let derived = self.derived_balances()?;
        let leaves = derived.iter().map(|(code, b)| (code.clone(), b.balance)).collect();
        let targets = chart.roll_up(&leaves);

        let corrections: Vec<_> = chart
            .accounts()
            .iter()
            .filter_map(|account| {
                let target = targets.get(&account.code).copied().unwrap_or_default();
                (account.balance != target).then_some((account.id, target))
            })
            .collect();
        let changed = corrections.len();
        self.repo.commit(PostingBatch::new().cached_balances(corrections))?;

        info!(changed, accounts = chart.accounts().len(), "Cached balances synced");
        Ok(changed)
    }

    /// Cached versus derived balances, unbalanced journals and double postings.
    ///
    /// # Errors
    ///
    /// `Store` or `Chart`.
    pub fn verify_integrity(&self) -> Result<IntegrityReport, EngineError> {
        let chart = self.chart()?;
        let journals = self.repo.journals(LedgerKind::Unified)?;
        let derived = derive_balances(&journals, |c| chart.normal_of(c), |_| true);
        let tolerance = self.config.posting.integrity_tolerance;

        let mut report = verify_cached_balances(&chart, &derived, tolerance);
        report.journals_checked = journals.iter().filter(|j| j.is_effective()).count();
        report.unbalanced_journals = find_unbalanced_journals(&journals, tolerance);
        report.double_postings = find_double_postings(&chart, &derived);

        if report.is_valid() {
            info!(
                accounts = report.accounts_checked,
                journals = report.journals_checked,
                "Balance integrity verified"
            );
        } else {
            error!(
                discrepancies = report.discrepancies.len(),
                unbalanced_journals = report.unbalanced_journals.len(),
                double_postings = report.double_postings.len(),
                severity = ?report.worst_severity(),
                "Balance integrity check failed"
            );
        }
        Ok(report)
    }

    /// Compares the legacy ledger with the unified one.
    ///
    /// # Errors
    ///
    /// `Store`.
    pub fn reconcile_ledgers(&self) -> Result<LedgerComparison, EngineError> {
        let legacy = self.repo.journals(LedgerKind::Legacy)?;
        let unified = self.repo.journals(LedgerKind::Unified)?;
        let comparison = compare_ledgers(&legacy, &unified, self.config.posting.integrity_tolerance);

        if comparison.is_consistent() {
            info!(legacy = legacy.len(), unified = unified.len(), "Ledgers reconciled");
        } else {
            warn!(
                differences = comparison.differences.len(),
                only_in_legacy = comparison.journals_only_in_legacy.len(),
                only_in_unified = comparison.journals_only_in_unified.len(),
                "Ledgers disagree"
            );
        }
        Ok(comparison)
    }

    /// Chronological statement of one account from the unified ledger.
    ///
    /// # Errors
    ///
    /// `Report(AccountNotFound)` for an unknown code.
    pub fn account_statement(&self, code: &str) -> Result<Vec<StatementLine>, EngineError> {
        let chart = self.chart()?;
        let account = chart
            .by_code(code)
            .ok_or_else(|| ReportError::AccountNotFound(code.to_string()))?;
        let journals = self.repo.journals(LedgerKind::Unified)?;
        Ok(account_statement(&journals, code, account.normal_balance()))
    }

    /// Derived balance of one account, zero when never posted.
    ///
    /// # Errors
    ///
    /// `Store` or `Chart`.
    pub fn derived_balance(&self, code: &str) -> Result<Decimal, EngineError> {
        Ok(self
            .derived_balances()?
            .get(code)
            .map_or(Decimal::ZERO, |b| b.balance))
    }
}
