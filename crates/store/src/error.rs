//! Store and engine errors.

use saldo_core::coa::ChartError;
use saldo_core::fiscal::ClosingError;
use saldo_core::ledger::{LedgerError, LedgerKind, SourceType};
use saldo_core::posting::PostingError;
use saldo_core::reports::ReportError;
use saldo_core::workflow::ReversalError;
use saldo_shared::AppError;
use saldo_shared::types::{AccountId, JournalId};
use thiserror::Error;

/// Result alias for repository operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`LedgerRepository`](crate::LedgerRepository).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A writer panicked while holding the lock.
    #[error("Ledger state lock poisoned")]
    Poisoned,

    /// Account ID not in the store.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Journal ID not in the given ledger.
    #[error("Journal {id} not found in {kind:?} ledger")]
    JournalNotFound {
        /// Ledger searched.
        kind: LedgerKind,
        /// Journal ID.
        id: JournalId,
    },

    /// Journal ID already written to the given ledger.
    #[error("Journal {id} already exists in {kind:?} ledger")]
    DuplicateJournal {
        /// Ledger written to.
        kind: LedgerKind,
        /// Journal ID.
        id: JournalId,
    },

    /// A live journal already exists for this source document.
    #[error("{source_type} document {reference} already has a live journal")]
    DuplicateSource {
        /// Kind of source.
        source_type: SourceType,
        /// Document reference.
        reference: String,
    },

    /// Journal already marked reversed.
    #[error("Journal {0} is already reversed")]
    AlreadyReversed(JournalId),
}

impl StoreError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Poisoned => "STORE_POISONED",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::JournalNotFound { .. } => "JOURNAL_NOT_FOUND",
            Self::DuplicateJournal { .. } => "DUPLICATE_JOURNAL",
            Self::DuplicateSource { .. } => "DUPLICATE_SOURCE",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Poisoned => Self::Storage(err.to_string()),
            StoreError::AccountNotFound(_) | StoreError::JournalNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            StoreError::DuplicateJournal { .. }
            | StoreError::DuplicateSource { .. }
            | StoreError::AlreadyReversed(_) => Self::Conflict(err.to_string()),
        }
    }
}

/// Errors raised by the [`PostingEngine`](crate::PostingEngine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Chart of accounts is inconsistent.
    #[error(transparent)]
    Chart(#[from] ChartError),

    /// Ledger rule violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Posting rule violated.
    #[error(transparent)]
    Posting(#[from] PostingError),

    /// Reversal rejected.
    #[error(transparent)]
    Reversal(#[from] ReversalError),

    /// Period closing rejected.
    #[error(transparent)]
    Closing(#[from] ClosingError),

    /// Report could not be generated.
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl EngineError {
    /// Returns the stable error code of the underlying error.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Store(err) => err.error_code(),
            Self::Chart(err) => err.error_code(),
            Self::Ledger(err) => err.error_code(),
            Self::Posting(err) => err.error_code(),
            Self::Reversal(err) => err.error_code(),
            Self::Closing(err) => err.error_code(),
            Self::Report(err) => err.error_code(),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Store(inner) => inner.into(),
            EngineError::Chart(inner) => inner.into(),
            EngineError::Ledger(inner) => inner.into(),
            EngineError::Posting(inner) => inner.into(),
            EngineError::Reversal(inner) => inner.into(),
            EngineError::Closing(inner) => inner.into(),
            EngineError::Report(inner) => inner.into(),
        }
    }
}
