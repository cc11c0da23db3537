//! Ledger error types for validation and posting-state errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use saldo_shared::AppError;
use thiserror::Error;

/// Errors that can occur while validating or resolving a journal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    // ========== Line Validation Errors ==========
    /// Journal has no lines.
    #[error("Journal must have at least one line")]
    NoLines,

    /// Journal has lines on one side only.
    #[error("Journal must have both debit and credit lines")]
    SingleSided,

    /// Line carries a negative amount.
    #[error("Line for account {account_code} has a negative amount: {amount}")]
    NegativeAmount {
        /// Account code of the offending line.
        account_code: String,
        /// The negative amount.
        amount: Decimal,
    },

    /// Line has neither a debit nor a credit.
    #[error("Line for account {0} has no amount")]
    ZeroLine(String),

    /// Line has both a debit and a credit.
    #[error("Line for account {0} has both a debit and a credit")]
    BothSides(String),

    // ========== Balance Errors ==========
    /// Debits and credits differ.
    #[error("Journal is not balanced. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit.
        debit: Decimal,
        /// Total credit.
        credit: Decimal,
    },

    /// Difference exceeds the auto-adjust tolerance.
    #[error("Journal imbalance {difference} exceeds the adjustable limit {limit}")]
    ImbalanceTooLarge {
        /// Debit minus credit.
        difference: Decimal,
        /// Largest difference that may be adjusted.
        limit: Decimal,
    },

    // ========== Account Errors ==========
    /// Account code not in the chart.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Account is inactive.
    #[error("Account {0} is inactive")]
    AccountInactive(String),

    /// Header accounts only aggregate their children.
    #[error("Account {0} is a header account and cannot be posted to")]
    HeaderAccount(String),

    // ========== Date Errors ==========
    /// Entry date falls in a closed period.
    #[error("Accounting period containing {0} is closed")]
    PeriodClosed(NaiveDate),

    /// Entry date is too far in the future.
    #[error("Entry date {date} is more than {max_days} days in the future")]
    FutureDate {
        /// Entry date.
        date: NaiveDate,
        /// Allowed days ahead.
        max_days: u32,
    },

    // ========== State Errors ==========
    /// Posted and reversed entries cannot be changed.
    #[error("Posted journals cannot be modified")]
    CannotModifyPosted,
}

impl LedgerError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::SingleSided => "SINGLE_SIDED",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::ZeroLine(_) => "ZERO_LINE",
            Self::BothSides(_) => "BOTH_SIDES",
            Self::Unbalanced { .. } => "UNBALANCED_JOURNAL",
            Self::ImbalanceTooLarge { .. } => "IMBALANCE_TOO_LARGE",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountInactive(_) => "ACCOUNT_INACTIVE",
            Self::HeaderAccount(_) => "HEADER_ACCOUNT",
            Self::PeriodClosed(_) => "PERIOD_CLOSED",
            Self::FutureDate { .. } => "FUTURE_DATE",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::AccountNotFound(_) => Self::NotFound(err.to_string()),
            LedgerError::NoLines
            | LedgerError::SingleSided
            | LedgerError::NegativeAmount { .. }
            | LedgerError::ZeroLine(_)
            | LedgerError::BothSides(_) => Self::Validation(err.to_string()),
            LedgerError::CannotModifyPosted => Self::Conflict(err.to_string()),
            _ => Self::BusinessRule(err.to_string()),
        }
    }
}
