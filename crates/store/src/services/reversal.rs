//! Journal reversal.

use saldo_core::coa::ChartOfAccounts;
use saldo_core::ledger::{BalancePolicy, JournalEntry, LedgerKind};
use saldo_core::workflow::{ReversalError, ReversalPlan, ReversalService};
use saldo_shared::types::{JournalId, UserId};
use tracing::info;

use super::engine::{PendingEntry, PostingEngine, PostingReceipt};
use crate::error::EngineError;
use crate::repository::{LedgerRepository, PostingBatch};

/// A validated reversal and the batch that writes it.
pub(crate) struct PendingReversal {
    pub(crate) plan: ReversalPlan,
    pub(crate) pending: PendingEntry,
    pub(crate) batch: PostingBatch,
}

impl<R: LedgerRepository> PostingEngine<R> {
    /// Reverses a posted journal by writing its mirror image.
    ///
    /// The reversal is dated today, or on the original's date if that is
    /// later. Both ledgers receive it and the original is marked reversed in
    /// each, in one batch.
    ///
    /// # Errors
    ///
    /// `Reversal` when the journal is missing, already reversed, a closing or
    /// reversing entry, unbalanced, or the reason is too short; `Ledger` when
    /// the reversal date is in a closed period.
    pub fn reverse(&self, journal_id: JournalId, reason: &str, user: UserId) -> Result<PostingReceipt, EngineError> {
        let original = self
            .repo
            .journal(LedgerKind::Unified, journal_id)?
            .ok_or(ReversalError::JournalNotFound(journal_id))?;

        let chart = self.chart()?;
        let PendingReversal { plan, pending, batch } = self.prepare_reversal(&chart, &original, reason, user)?;
        let numbers = self.repo.commit(batch)?;

        let receipt = self.receipt(&pending.numbered(&numbers));
        log_reversal(&plan, &receipt);
        Ok(receipt)
    }

    /// Builds the reversing entry for `original` and the batch that writes it
    /// and marks the original reversed in every ledger holding it live.
    pub(crate) fn prepare_reversal(
        &self,
        chart: &ChartOfAccounts,
        original: &JournalEntry,
        reason: &str,
        user: UserId,
    ) -> Result<PendingReversal, EngineError> {
        let date = self.today().max(original.entry_date);
        let plan = ReversalService::build(original, reason, date, self.config.posting.min_reversal_reason)?;

        let mut pending = self.prepare_entry(chart, &plan.draft, &BalancePolicy::exact(), user)?;
        pending.entry.reversal_of = Some(original.id);

        let mut batch = self
            .batch_for(&pending)
            .mark_reversed(LedgerKind::Unified, original.id, pending.entry.id);
        let legacy_live = self
            .repo
            .journal(LedgerKind::Legacy, original.id)?
            .is_some_and(|j| j.reversed_by.is_none());
        if self.config.ledger.mirror_legacy && legacy_live {
            batch = batch.mark_reversed(LedgerKind::Legacy, original.id, pending.entry.id);
        }

        Ok(PendingReversal { plan, pending, batch })
    }
}

pub(crate) fn log_reversal(plan: &ReversalPlan, receipt: &PostingReceipt) {
    info!(
        original = %plan.original_number,
        reversal = %receipt.entry_number,
        reason = %plan.reason,
        "Journal reversed"
    );
}
