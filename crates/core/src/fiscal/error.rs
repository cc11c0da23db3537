//! Period closing errors.

use chrono::NaiveDate;
use saldo_shared::AppError;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors raised while closing a period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClosingError {
    /// End date before start date.
    #[error("Invalid period: end date {end} is before start date {start}")]
    InvalidDateRange {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// Range overlaps an already closed period.
    #[error("Period overlaps closed period {start} to {end}")]
    PeriodOverlap {
        /// Start of the closed period.
        start: NaiveDate,
        /// End of the closed period.
        end: NaiveDate,
    },

    /// No revenue or expense balances in the range.
    #[error("Nothing to close between {start} and {end}")]
    NothingToClose {
        /// Requested start.
        start: NaiveDate,
        /// Requested end.
        end: NaiveDate,
    },

    /// Closing journal failed ledger checks.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl ClosingError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::PeriodOverlap { .. } => "PERIOD_OVERLAP",
            Self::NothingToClose { .. } => "NOTHING_TO_CLOSE",
            Self::Ledger(err) => err.error_code(),
        }
    }
}

impl From<ClosingError> for AppError {
    fn from(err: ClosingError) -> Self {
        match err {
            ClosingError::Ledger(inner) => inner.into(),
            ClosingError::InvalidDateRange { .. } => Self::Validation(err.to_string()),
            ClosingError::PeriodOverlap { .. } => Self::Conflict(err.to_string()),
            ClosingError::NothingToClose { .. } => Self::BusinessRule(err.to_string()),
        }
    }
}
