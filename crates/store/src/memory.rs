//! In-memory dual-ledger store.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;
use saldo_core::coa::Account;
use saldo_core::fiscal::AccountingPeriod;
use saldo_core::ledger::{JournalEntry, JournalStatus, LedgerKind, SourceType};
use saldo_shared::types::{AccountId, JournalId};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::repository::{EntryNumbers, LedgerRepository, PostingBatch};

#[derive(Debug, Default)]
struct LedgerState {
    accounts: BTreeMap<String, Account>,
    legacy: Vec<JournalEntry>,
    unified: Vec<JournalEntry>,
    sequences: HashMap<String, u64>,
    periods: Vec<AccountingPeriod>,
}

/// Document source an entry holds live, if it is a document posting.
fn live_source(entry: &JournalEntry) -> Option<(SourceType, Uuid)> {
    let source_id = entry.source.source_id?;
    entry.source.source_type.is_document().then_some((entry.source.source_type, source_id))
}

fn duplicate_source(entry: &JournalEntry) -> StoreError {
    StoreError::DuplicateSource {
        source_type: entry.source.source_type,
        reference: entry.source.reference.clone(),
    }
}

impl LedgerState {
    fn ledger(&self, kind: LedgerKind) -> &[JournalEntry] {
        match kind {
            LedgerKind::Legacy => &self.legacy,
            LedgerKind::Unified => &self.unified,
        }
    }

    fn ledger_mut(&mut self, kind: LedgerKind) -> &mut Vec<JournalEntry> {
        match kind {
            LedgerKind::Legacy => &mut self.legacy,
            LedgerKind::Unified => &mut self.unified,
        }
    }

    fn account_mut(&mut self, id: AccountId) -> StoreResult<&mut Account> {
        self.accounts
            .values_mut()
            .find(|a| a.id == id)
            .ok_or(StoreError::AccountNotFound(id))
    }

    fn live_for_source(&self, kind: LedgerKind, source_type: SourceType, source_id: Uuid) -> Option<&JournalEntry> {
        self.ledger(kind).iter().rev().find(|j| {
            j.source.source_type == source_type
                && j.source.source_id == Some(source_id)
                && j.status == JournalStatus::Posted
                && j.reversed_by.is_none()
        })
    }

    /// `released` holds journals the same batch marks reversed; their
    /// sources are free for a new live journal.
    fn check_insert(
        &self,
        kind: LedgerKind,
        entry: &JournalEntry,
        released: &HashSet<(LedgerKind, JournalId)>,
    ) -> StoreResult<()> {
        if self.ledger(kind).iter().any(|j| j.id == entry.id) {
            return Err(StoreError::DuplicateJournal { kind, id: entry.id });
        }
        if let Some((source_type, source_id)) = live_source(entry)
            && self
                .live_for_source(kind, source_type, source_id)
                .is_some_and(|live| !released.contains(&(kind, live.id)))
        {
            return Err(duplicate_source(entry));
        }
        Ok(())
    }

    fn check_reversal(&self, kind: LedgerKind, id: JournalId) -> StoreResult<()> {
        let journal = self
            .ledger(kind)
            .iter()
            .find(|j| j.id == id)
            .ok_or(StoreError::JournalNotFound { kind, id })?;
        if journal.reversed_by.is_some() {
            return Err(StoreError::AlreadyReversed(id));
        }
        Ok(())
    }

    /// Validates a batch against committed state and against itself.
    fn check_batch(&self, batch: &PostingBatch) -> StoreResult<()> {
        let mut released = HashSet::new();
        for (kind, original, _) in &batch.reversals {
            self.check_reversal(*kind, *original)?;
            if !released.insert((*kind, *original)) {
                return Err(StoreError::AlreadyReversed(*original));
            }
        }

        let mut ids = HashSet::new();
        let mut sources = HashSet::new();
        for (kind, entry) in &batch.journals {
            self.check_insert(*kind, entry, &released)?;
            if !ids.insert((*kind, entry.id)) {
                return Err(StoreError::DuplicateJournal { kind: *kind, id: entry.id });
            }
            if let Some((source_type, source_id)) = live_source(entry)
                && !sources.insert((*kind, source_type, source_id))
            {
                return Err(duplicate_source(entry));
            }
        }

        let accounts = batch.balance_deltas.iter().chain(&batch.cached_balances);
        for (account_id, _) in accounts {
            if !self.accounts.values().any(|a| a.id == *account_id) {
                return Err(StoreError::AccountNotFound(*account_id));
            }
        }
        Ok(())
    }

    fn next_number(&mut self, prefix: &str) -> String {
        let next = self.sequences.entry(prefix.to_string()).or_default();
        *next += 1;
        format!("{prefix}-{next:06}")
    }

    fn mark_reversed(&mut self, kind: LedgerKind, id: JournalId, by: JournalId) -> StoreResult<()> {
        let journal = self
            .ledger_mut(kind)
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or(StoreError::JournalNotFound { kind, id })?;
        journal.status = JournalStatus::Reversed;
        journal.reversed_by = Some(by);
        Ok(())
    }
}

/// Thread-safe in-memory implementation of [`LedgerRepository`].
///
/// Holds both ledgers side by side. Batches are validated in full before any
/// write, so a failed commit leaves the state untouched.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<LedgerState>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `accounts`.
    #[must_use]
    pub fn with_accounts(accounts: Vec<Account>) -> Self {
        let state = LedgerState {
            accounts: accounts.into_iter().map(|a| (a.code.clone(), a)).collect(),
            ..LedgerState::default()
        };
        Self {
            state: RwLock::new(state),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, LedgerState>> {
        self.state.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, LedgerState>> {
        self.state.write().map_err(|_| StoreError::Poisoned)
    }
}

impl LedgerRepository for MemoryStore {
    fn accounts(&self) -> StoreResult<Vec<Account>> {
        Ok(self.read()?.accounts.values().cloned().collect())
    }

    fn account_by_code(&self, code: &str) -> StoreResult<Option<Account>> {
        Ok(self.read()?.accounts.get(code).cloned())
    }

    fn account_by_id(&self, id: AccountId) -> StoreResult<Option<Account>> {
        Ok(self.read()?.accounts.values().find(|a| a.id == id).cloned())
    }

    fn upsert_account(&self, account: Account) -> StoreResult<()> {
        self.write()?.accounts.insert(account.code.clone(), account);
        Ok(())
    }

    fn apply_balance_delta(&self, account_id: AccountId, delta: Decimal) -> StoreResult<Decimal> {
        let mut state = self.write()?;
        let account = state.account_mut(account_id)?;
        account.balance += delta;
        Ok(account.balance)
    }

    fn set_cached_balance(&self, account_id: AccountId, balance: Decimal) -> StoreResult<()> {
        self.write()?.account_mut(account_id)?.balance = balance;
        Ok(())
    }

    fn next_entry_number(&self, prefix: &str) -> StoreResult<String> {
        Ok(self.write()?.next_number(prefix))
    }

    fn insert_journal(&self, kind: LedgerKind, entry: JournalEntry) -> StoreResult<()> {
        let mut state = self.write()?;
        state.check_insert(kind, &entry, &HashSet::new())?;
        state.ledger_mut(kind).push(entry);
        Ok(())
    }

    fn journal(&self, kind: LedgerKind, id: JournalId) -> StoreResult<Option<JournalEntry>> {
        Ok(self.read()?.ledger(kind).iter().find(|j| j.id == id).cloned())
    }

    fn journals(&self, kind: LedgerKind) -> StoreResult<Vec<JournalEntry>> {
        Ok(self.read()?.ledger(kind).to_vec())
    }

    fn journal_for_source(
        &self,
        kind: LedgerKind,
        source_type: SourceType,
        source_id: Uuid,
    ) -> StoreResult<Option<JournalEntry>> {
        Ok(self.read()?.live_for_source(kind, source_type, source_id).cloned())
    }

    fn mark_reversed(&self, kind: LedgerKind, id: JournalId, by: JournalId) -> StoreResult<()> {
        let mut state = self.write()?;
        state.check_reversal(kind, id)?;
        state.mark_reversed(kind, id, by)
    }

    fn periods(&self) -> StoreResult<Vec<AccountingPeriod>> {
        Ok(self.read()?.periods.clone())
    }

    fn insert_period(&self, period: AccountingPeriod) -> StoreResult<()> {
        self.write()?.periods.push(period);
        Ok(())
    }

    fn commit(&self, batch: PostingBatch) -> StoreResult<EntryNumbers> {
        let mut state = self.write()?;
        state.check_batch(&batch)?;

        let numbers: EntryNumbers = batch
            .numbering
            .iter()
            .map(|(id, prefix)| (*id, state.next_number(prefix)))
            .collect();

        for (kind, original, by) in batch.reversals {
            state.mark_reversed(kind, original, by)?;
        }
        for (kind, mut entry) in batch.journals {
            if let Some(number) = numbers.get(&entry.id) {
                entry.entry_number.clone_from(number);
            }
            state.ledger_mut(kind).push(entry);
        }
        for (account_id, delta) in batch.balance_deltas {
            state.account_mut(account_id)?.balance += delta;
        }
        for (account_id, balance) in batch.cached_balances {
            state.account_mut(account_id)?.balance = balance;
        }
        if let Some(period) = batch.period {
            state.periods.push(period);
        }
        Ok(numbers)
    }
}
