//! Repository abstraction for ledger storage.
//!
//! The engine talks to storage only through [`LedgerRepository`], so the
//! posting rules run unchanged against the in-memory store or any other
//! backend that implements the trait.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use saldo_core::coa::Account;
use saldo_core::fiscal::AccountingPeriod;
use saldo_core::ledger::{JournalEntry, LedgerKind, SourceType};
use saldo_shared::types::{AccountId, JournalId};
use uuid::Uuid;

use crate::error::StoreResult;

/// Entry numbers handed out by a commit, per journal.
pub type EntryNumbers = BTreeMap<JournalId, String>;

/// Writes that must land together or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingBatch {
    /// Journals to insert, per ledger.
    pub journals: Vec<(LedgerKind, JournalEntry)>,
    /// Journals numbered at commit time, with the sequence prefix to draw from.
    /// Every copy of the journal in the batch receives the same number.
    pub numbering: Vec<(JournalId, String)>,
    /// Journals to mark reversed: ledger, original, reversing entry.
    pub reversals: Vec<(LedgerKind, JournalId, JournalId)>,
    /// Cached balance changes.
    pub balance_deltas: Vec<(AccountId, Decimal)>,
    /// Cached balances to overwrite, applied after the deltas.
    pub cached_balances: Vec<(AccountId, Decimal)>,
    /// Closed period to record.
    pub period: Option<AccountingPeriod>,
}

impl PostingBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a journal insert.
    #[must_use]
    pub fn journal(mut self, kind: LedgerKind, entry: JournalEntry) -> Self {
        self.journals.push((kind, entry));
        self
    }

    /// Numbers journal `id` from the `prefix` sequence when the batch commits.
    #[must_use]
    pub fn number(mut self, id: JournalId, prefix: impl Into<String>) -> Self {
        self.numbering.push((id, prefix.into()));
        self
    }

    /// Marks `original` as reversed by `by`.
    #[must_use]
    pub fn mark_reversed(mut self, kind: LedgerKind, original: JournalId, by: JournalId) -> Self {
        self.reversals.push((kind, original, by));
        self
    }

    /// Adds cached balance changes.
    #[must_use]
    pub fn deltas(mut self, deltas: impl IntoIterator<Item = (AccountId, Decimal)>) -> Self {
        self.balance_deltas.extend(deltas);
        self
    }

    /// Overwrites cached balances.
    #[must_use]
    pub fn cached_balances(mut self, balances: impl IntoIterator<Item = (AccountId, Decimal)>) -> Self {
        self.cached_balances.extend(balances);
        self
    }

    /// Appends every write of `other`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.journals.extend(other.journals);
        self.numbering.extend(other.numbering);
        self.reversals.extend(other.reversals);
        self.balance_deltas.extend(other.balance_deltas);
        self.cached_balances.extend(other.cached_balances);
        self.period = other.period.or(self.period);
        self
    }

    /// Records a closed period.
    #[must_use]
    pub fn period(mut self, period: AccountingPeriod) -> Self {
        self.period = Some(period);
        self
    }
}

/// Storage seam for accounts, both ledgers, and closed periods.
///
/// Reads return owned snapshots. Implementations must make [`commit`]
/// atomic: after an error, none of the batch is visible.
///
/// [`commit`]: LedgerRepository::commit
pub trait LedgerRepository: Send + Sync {
    /// All accounts, ordered by code.
    fn accounts(&self) -> StoreResult<Vec<Account>>;

    /// Account by code.
    fn account_by_code(&self, code: &str) -> StoreResult<Option<Account>>;

    /// Account by ID.
    fn account_by_id(&self, id: AccountId) -> StoreResult<Option<Account>>;

    /// Inserts or replaces an account, matched by code.
    fn upsert_account(&self, account: Account) -> StoreResult<()>;

    /// Adds `delta` to the cached balance and returns the new balance.
    fn apply_balance_delta(&self, account_id: AccountId, delta: Decimal) -> StoreResult<Decimal>;

    /// Overwrites the cached balance.
    fn set_cached_balance(&self, account_id: AccountId, balance: Decimal) -> StoreResult<()>;

    /// Next entry number for `prefix`, e.g. `JE-2026-000001` for `JE-2026`.
    fn next_entry_number(&self, prefix: &str) -> StoreResult<String>;

    /// Inserts one journal.
    fn insert_journal(&self, kind: LedgerKind, entry: JournalEntry) -> StoreResult<()>;

    /// Journal by ID.
    fn journal(&self, kind: LedgerKind, id: JournalId) -> StoreResult<Option<JournalEntry>>;

    /// All journals of a ledger in insertion order.
    fn journals(&self, kind: LedgerKind) -> StoreResult<Vec<JournalEntry>>;

    /// Latest journal for a source document that has not been reversed.
    fn journal_for_source(
        &self,
        kind: LedgerKind,
        source_type: SourceType,
        source_id: Uuid,
    ) -> StoreResult<Option<JournalEntry>>;

    /// Marks a journal reversed.
    fn mark_reversed(&self, kind: LedgerKind, id: JournalId, by: JournalId) -> StoreResult<()>;

    /// Closed periods.
    fn periods(&self) -> StoreResult<Vec<AccountingPeriod>>;

    /// Records a closed period.
    fn insert_period(&self, period: AccountingPeriod) -> StoreResult<()>;

    /// Applies a batch atomically and returns the entry numbers it assigned.
    ///
    /// Numbers are drawn only once the batch is known to apply, so a rejected
    /// batch leaves no gap in the sequence.
    fn commit(&self, batch: PostingBatch) -> StoreResult<EntryNumbers>;
}
