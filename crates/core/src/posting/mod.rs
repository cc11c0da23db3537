//! Posting rules: business documents to journal drafts.
//!
//! Each document type knows its journal source, whether its status allows
//! posting, and how to build its debit and credit lines. The store drives
//! these through [`PostableDocument`] without knowing the document type.

pub mod error;
pub mod payment;
pub mod payment_method;
pub mod purchase;
pub mod sales;
pub mod status;

#[cfg(test)]
mod sales_props;

pub use error::PostingError;
pub use payment::{PaymentDocument, PaymentJournalBuilder, PurchasePayment, SaleReceipt};
pub use payment_method::PaymentMethod;
pub use purchase::{PurchaseDocument, PurchaseItem, PurchaseJournalBuilder};
pub use sales::{SaleDocument, SaleItem, SalesJournalBuilder};
pub use status::{PostingDecision, PurchaseStatus, SaleStatus};

use chrono::NaiveDate;
use saldo_shared::{AccountMapping, AppConfig, LedgerSettings, PostingSettings};

use crate::ledger::{BalancePolicy, JournalDraft, JournalSource};

/// Settings the posting rules read.
#[derive(Debug, Clone, Copy)]
pub struct PostingContext<'a> {
    /// Default account codes.
    pub accounts: &'a AccountMapping,
    /// Tolerances and thresholds.
    pub posting: &'a PostingSettings,
    /// Ledger-wide settings.
    pub ledger: &'a LedgerSettings,
}

impl<'a> PostingContext<'a> {
    /// Context borrowing from the application configuration.
    #[must_use]
    pub fn from_config(config: &'a AppConfig) -> Self {
        Self {
            accounts: &config.accounts,
            posting: &config.posting,
            ledger: &config.ledger,
        }
    }
}

/// A business document that can produce a journal.
pub trait PostableDocument {
    /// Journal source identifying this document.
    fn source(&self) -> JournalSource;

    /// Current status, for messages.
    fn status_label(&self) -> String;

    /// Whether the current status allows posting.
    fn allows_posting(&self) -> bool;

    /// Accounting date of the journal.
    fn entry_date(&self) -> NaiveDate;

    /// Builds the unposted journal.
    ///
    /// # Errors
    ///
    /// Returns `PostingError` when the document amounts are inconsistent.
    fn build_draft(&self, ctx: &PostingContext<'_>) -> Result<JournalDraft, PostingError>;

    /// Tolerance applied to the draft. Exact unless overridden.
    fn balance_policy(&self, _ctx: &PostingContext<'_>) -> BalancePolicy {
        BalancePolicy::exact()
    }
}
