//! Double-entry bookkeeping logic.
//!
//! This module implements the core ledger functionality:
//! - Journal entries and lines (immutable once posted)
//! - Drafts built by posting rules, with tolerance settlement
//! - Line validation: sum(debits) == sum(credits)
//! - Balance derivation from posted lines
//! - Account resolution against the chart of accounts

pub mod balance;
pub mod draft;
pub mod entry;
pub mod error;
pub mod service;
pub mod tolerance;
pub mod types;
pub mod validation;

#[cfg(test)]
mod service_props;
#[cfg(test)]
mod validation_props;

pub use balance::{
    AccountBalance, NormalBalance, RunningBalance, StatementLine, account_statement,
    compute_deltas, derive_balances,
};
pub use draft::{DraftLine, JournalDraft};
pub use entry::{JournalEntry, JournalLine};
pub use error::LedgerError;
pub use service::{AccountInfo, LedgerService, PreparedJournal};
pub use tolerance::{BalancePolicy, Settlement};
pub use types::{EntryType, JournalSource, JournalStatus, JournalTotals, LedgerKind, SourceType};
pub use validation::validate_lines;
