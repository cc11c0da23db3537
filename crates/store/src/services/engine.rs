//! Posting engine: drives core posting rules against a repository.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use saldo_core::coa::{Account, ChartOfAccounts};
use saldo_core::fiscal::is_date_in_closed_period;
use saldo_core::ledger::{
    BalancePolicy, JournalDraft, JournalEntry, LedgerKind, LedgerService, Settlement,
    compute_deltas,
};
use saldo_shared::AppConfig;
use saldo_shared::types::{AccountId, JournalId, UserId};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EngineError;
use crate::repository::{EntryNumbers, LedgerRepository, PostingBatch};

/// What a successful posting wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingReceipt {
    /// Journal ID, shared by the unified entry and its legacy mirror.
    pub journal_id: JournalId,
    /// Entry number.
    pub entry_number: String,
    /// Source reference.
    pub reference: String,
    /// Accounting date.
    pub entry_date: NaiveDate,
    /// Sum of debits.
    pub total_debit: Decimal,
    /// Sum of credits.
    pub total_credit: Decimal,
    /// How the draft was balanced.
    pub settlement: Settlement,
    /// Whether the legacy ledger received a copy.
    pub mirrored: bool,
}

/// A prepared entry and the cached balance changes it implies.
///
/// The entry number stays empty until the batch commits.
#[derive(Debug, Clone)]
pub(crate) struct PendingEntry {
    pub(crate) entry: JournalEntry,
    pub(crate) prefix: String,
    pub(crate) settlement: Settlement,
    pub(crate) deltas: Vec<(AccountId, Decimal)>,
}

impl PendingEntry {
    /// Takes the number the commit assigned to this entry.
    pub(crate) fn numbered(mut self, numbers: &EntryNumbers) -> Self {
        if let Some(number) = numbers.get(&self.entry.id) {
            self.entry.entry_number.clone_from(number);
        }
        self
    }
}

/// Orchestrates posting, reversal, closing and reconciliation over a
/// [`LedgerRepository`].
///
/// Every write goes to the unified ledger and, when `mirror_legacy` is set, to
/// the legacy ledger in the same batch.
pub struct PostingEngine<R> {
    pub(crate) repo: R,
    pub(crate) config: AppConfig,
    today: Option<NaiveDate>,
}

impl<R: LedgerRepository> PostingEngine<R> {
    /// Creates an engine.
    #[must_use]
    pub fn new(repo: R, config: AppConfig) -> Self {
        Self {
            repo,
            config,
            today: None,
        }
    }

    /// Pins "today" for future-date checks instead of the system clock.
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// The configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub(crate) fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Validates and stores a chart of accounts.
    ///
    /// Accounts already present are replaced, matched by code.
    ///
    /// # Errors
    ///
    /// `Chart` when the accounts do not form a valid chart.
    pub fn load_chart(&self, accounts: Vec<Account>) -> Result<usize, EngineError> {
        let chart = ChartOfAccounts::new(accounts)?;
        for account in chart.accounts() {
            self.repo.upsert_account(account.clone())?;
        }
        info!(accounts = chart.accounts().len(), "Chart of accounts loaded");
        Ok(chart.accounts().len())
    }

    /// Current chart of accounts, with cached balances.
    ///
    /// # Errors
    ///
    /// `Store` or `Chart`.
    pub fn chart(&self) -> Result<ChartOfAccounts, EngineError> {
        Ok(ChartOfAccounts::new(self.repo.accounts()?)?)
    }

    /// Journals of one ledger.
    ///
    /// # Errors
    ///
    /// `Store`.
    pub fn journals(&self, kind: LedgerKind) -> Result<Vec<JournalEntry>, EngineError> {
        Ok(self.repo.journals(kind)?)
    }

    /// Settles and validates a draft without writing it.
    pub(crate) fn prepare_entry(
        &self,
        chart: &ChartOfAccounts,
        draft: &JournalDraft,
        policy: &BalancePolicy,
        user: UserId,
    ) -> Result<PendingEntry, EngineError> {
        let periods = self.repo.periods()?;
        let prepared = LedgerService::prepare(
            draft,
            policy,
            &self.config.ledger,
            self.today(),
            |code| chart.account_info(code),
            |date| is_date_in_closed_period(date, &periods),
        )?;

        if prepared.settlement.is_adjusted() {
            warn!(
                reference = %draft.source.reference,
                settlement = ?prepared.settlement,
                "Imbalance adjusted on first debit line"
            );
        }

        let prefix = format!("{}-{}", self.config.ledger.entry_prefix, draft.entry_date.year());
        let entry = JournalEntry::posted(
            String::new(),
            draft.source.clone(),
            draft.entry_date,
            draft.description.clone(),
            prepared.lines,
            user,
        );
        let deltas = cascade_deltas(chart, &compute_deltas(&entry.lines, |c| chart.normal_of(c)));

        Ok(PendingEntry {
            entry,
            prefix,
            settlement: prepared.settlement,
            deltas,
        })
    }

    /// Batch writing `pending` to the unified ledger, its legacy mirror, and
    /// the cached balances.
    pub(crate) fn batch_for(&self, pending: &PendingEntry) -> PostingBatch {
        let mut batch = PostingBatch::new()
            .journal(LedgerKind::Unified, pending.entry.clone())
            .number(pending.entry.id, pending.prefix.clone())
            .deltas(pending.deltas.iter().copied());
        if self.config.ledger.mirror_legacy {
            batch = batch.journal(LedgerKind::Legacy, pending.entry.clone());
        }
        batch
    }

    pub(crate) fn receipt(&self, pending: &PendingEntry) -> PostingReceipt {
        PostingReceipt {
            journal_id: pending.entry.id,
            entry_number: pending.entry.entry_number.clone(),
            reference: pending.entry.source.reference.clone(),
            entry_date: pending.entry.entry_date,
            total_debit: pending.entry.total_debit,
            total_credit: pending.entry.total_credit,
            settlement: pending.settlement,
            mirrored: self.config.ledger.mirror_legacy,
        }
    }

    /// Prepares and commits a draft in one batch.
    pub(crate) fn post_draft(
        &self,
        draft: &JournalDraft,
        policy: &BalancePolicy,
        user: UserId,
    ) -> Result<PostingReceipt, EngineError> {
        let chart = self.chart()?;
        let pending = self.prepare_entry(&chart, draft, policy, user)?;
        let numbers = self.repo.commit(self.batch_for(&pending))?;

        let receipt = self.receipt(&pending.numbered(&numbers));
        info!(
            journal_id = %receipt.journal_id,
            entry_number = %receipt.entry_number,
            reference = %receipt.reference,
            total = %receipt.total_debit,
            "Journal posted"
        );
        Ok(receipt)
    }
}

/// Adds each leaf delta to the account and all of its ancestors.
fn cascade_deltas(chart: &ChartOfAccounts, deltas: &BTreeMap<String, Decimal>) -> Vec<(AccountId, Decimal)> {
    let mut totals: BTreeMap<AccountId, Decimal> = BTreeMap::new();
    for (code, delta) in deltas {
        let mut cursor = chart.by_code(code);
        while let Some(account) = cursor {
            *totals.entry(account.id).or_default() += *delta;
            cursor = account.parent_code.as_deref().and_then(|p| chart.by_code(p));
        }
    }
    totals.into_iter().filter(|(_, d)| !d.is_zero()).collect()
}
