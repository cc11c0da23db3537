//! Reversal error types.

use rust_decimal::Decimal;
use saldo_shared::AppError;
use saldo_shared::types::JournalId;
use thiserror::Error;

use crate::ledger::JournalStatus;

/// Errors that can occur when reversing a journal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReversalError {
    /// Journal does not exist.
    #[error("Journal {0} not found")]
    JournalNotFound(JournalId),

    /// Only posted journals can be reversed.
    #[error("Journal {entry_number} is {status:?}, only posted journals can be reversed")]
    NotPosted {
        /// Entry number.
        entry_number: String,
        /// Current status.
        status: JournalStatus,
    },

    /// Journal already has a reversal.
    #[error("Journal {0} is already reversed")]
    AlreadyReversed(String),

    /// Closing journals are not reversible.
    #[error("Journal {0} is a period closing entry and cannot be reversed")]
    ClosingEntry(String),

    /// Reversing entries are not reversible.
    #[error("Journal {0} is a reversing entry and cannot be reversed")]
    ReversalEntry(String),

    /// Stored journal does not balance.
    #[error("Journal {entry_number} is unbalanced: debit={debit}, credit={credit}")]
    Unbalanced {
        /// Entry number.
        entry_number: String,
        /// Total debits.
        debit: Decimal,
        /// Total credits.
        credit: Decimal,
    },

    /// Reason missing or too short.
    #[error("Reversal reason must be at least {min} characters")]
    ReasonTooShort {
        /// Required length.
        min: usize,
    },
}

impl ReversalError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::JournalNotFound(_) => "JOURNAL_NOT_FOUND",
            Self::NotPosted { .. } => "JOURNAL_NOT_POSTED",
            Self::AlreadyReversed(_) => "ALREADY_REVERSED",
            Self::ClosingEntry(_) => "CLOSING_ENTRY_NOT_REVERSIBLE",
            Self::ReversalEntry(_) => "REVERSAL_NOT_REVERSIBLE",
            Self::Unbalanced { .. } => "UNBALANCED_JOURNAL",
            Self::ReasonTooShort { .. } => "REASON_TOO_SHORT",
        }
    }
}

impl From<ReversalError> for AppError {
    fn from(err: ReversalError) -> Self {
        match err {
            ReversalError::JournalNotFound(_) => Self::NotFound(err.to_string()),
            ReversalError::ReasonTooShort { .. } => Self::Validation(err.to_string()),
            ReversalError::AlreadyReversed(_) => Self::Conflict(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
