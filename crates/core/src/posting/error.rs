//! Posting rule errors.

use rust_decimal::Decimal;
use saldo_shared::AppError;
use thiserror::Error;

use crate::ledger::LedgerError;

/// Errors raised while turning a business document into a journal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostingError {
    /// Document status does not allow posting.
    #[error("Document {reference} with status {status} cannot be posted")]
    NotPostable {
        /// Document reference.
        reference: String,
        /// Current status.
        status: String,
    },

    /// Computed amount is zero or negative.
    #[error("Document {reference} has non-positive amount {amount}")]
    NonPositiveAmount {
        /// Document reference.
        reference: String,
        /// Offending amount.
        amount: Decimal,
    },

    /// Declared subtotal disagrees with the items.
    #[error("Subtotal mismatch on {reference}: declared {declared}, items sum to {computed}")]
    SubtotalMismatch {
        /// Document reference.
        reference: String,
        /// Subtotal carried by the document.
        declared: Decimal,
        /// Sum of item totals.
        computed: Decimal,
    },

    /// Receipt larger than what is still owed.
    #[error("Payment {reference} of {amount} exceeds outstanding {outstanding}")]
    Overpayment {
        /// Payment reference.
        reference: String,
        /// Payment amount.
        amount: Decimal,
        /// Amount still owed.
        outstanding: Decimal,
    },

    /// Document has no items.
    #[error("Document {0} has no items")]
    NoItems(String),

    /// Ledger rule violated by the generated draft.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl PostingError {
    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotPostable { .. } => "STATUS_NOT_POSTABLE",
            Self::NonPositiveAmount { .. } => "NON_POSITIVE_AMOUNT",
            Self::SubtotalMismatch { .. } => "SUBTOTAL_MISMATCH",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::NoItems(_) => "NO_ITEMS",
            Self::Ledger(err) => err.error_code(),
        }
    }
}

impl From<PostingError> for AppError {
    fn from(err: PostingError) -> Self {
        match err {
            PostingError::Ledger(inner) => inner.into(),
            PostingError::NotPostable { .. } | PostingError::Overpayment { .. } => {
                Self::BusinessRule(err.to_string())
            }
            _ => Self::Validation(err.to_string()),
        }
    }
}
