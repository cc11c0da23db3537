//! Domain types for journal posting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Side of a journal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl EntryType {
    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// Lifecycle of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JournalStatus {
    /// Built but not yet written to a ledger.
    Draft,
    /// Written to the ledger.
    Posted,
    /// Posted, then offset by a reversal entry.
    Reversed,
}

impl JournalStatus {
    /// Posted and reversed entries can never be edited or deleted.
    #[must_use]
    pub const fn is_immutable(self) -> bool {
        matches!(self, Self::Posted | Self::Reversed)
    }

    /// Whether the entry's lines count toward account balances.
    ///
    /// A reversed entry still counts: its reversal carries the offset.
    #[must_use]
    pub const fn counts_toward_balance(self) -> bool {
        matches!(self, Self::Posted | Self::Reversed)
    }

    /// Only plain posted entries may be reversed.
    #[must_use]
    pub const fn can_reverse(self) -> bool {
        matches!(self, Self::Posted)
    }
}

/// Business event that produced a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceType {
    /// Sales invoice.
    Sale,
    /// Purchase document.
    Purchase,
    /// Customer payment against a sale.
    SalePayment,
    /// Payment to a vendor against a purchase.
    PurchasePayment,
    /// Period closing entry.
    Closing,
    /// Reversal of another journal.
    Reversal,
    /// Manual journal.
    Manual,
}

impl SourceType {
    /// Stable string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sale => "SALE",
            Self::Purchase => "PURCHASE",
            Self::SalePayment => "SALE_PAYMENT",
            Self::PurchasePayment => "PURCHASE_PAYMENT",
            Self::Closing => "CLOSING",
            Self::Reversal => "REVERSAL",
            Self::Manual => "MANUAL",
        }
    }

    /// Whether a source document may own at most one live journal.
    #[must_use]
    pub const fn is_document(self) -> bool {
        matches!(
            self,
            Self::Sale | Self::Purchase | Self::SalePayment | Self::PurchasePayment
        )
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Link from a journal back to the event that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JournalSource {
    /// Kind of source.
    pub source_type: SourceType,
    /// ID of the source document, when there is one.
    pub source_id: Option<Uuid>,
    /// Human-readable reference, e.g. `SALE-INV-0001`.
    pub reference: String,
}

impl JournalSource {
    /// Creates a source for a document.
    #[must_use]
    pub fn document(source_type: SourceType, source_id: Uuid, reference: impl Into<String>) -> Self {
        Self {
            source_type,
            source_id: Some(source_id),
            reference: reference.into(),
        }
    }

    /// Creates a source with no backing document.
    #[must_use]
    pub fn standalone(source_type: SourceType, reference: impl Into<String>) -> Self {
        Self {
            source_type,
            source_id: None,
            reference: reference.into(),
        }
    }
}

/// The two ledgers that coexist: the legacy journal tables and the unified one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerKind {
    /// Older journal tables; updated for immediate balance visibility.
    Legacy,
    /// Unified journal; the source of truth for derived balances.
    Unified,
}

/// Debit and credit totals of a journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalTotals {
    /// Sum of debit amounts.
    pub total_debit: Decimal,
    /// Sum of credit amounts.
    pub total_credit: Decimal,
}

impl JournalTotals {
    /// Creates totals.
    #[must_use]
    pub const fn new(total_debit: Decimal, total_credit: Decimal) -> Self {
        Self {
            total_debit,
            total_credit,
        }
    }

    /// Debit minus credit.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.total_debit - self.total_credit
    }

    /// Exact balance.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total_debit == self.total_credit
    }

    /// Balance within `tolerance`.
    #[must_use]
    pub fn is_balanced_within(&self, tolerance: Decimal) -> bool {
        self.difference().abs() <= tolerance
    }
}
