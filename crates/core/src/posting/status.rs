//! Document statuses and the posting decision on a status change.
//!
//! A document posts to the ledger only while its status allows it. Leaving a
//! postable status reverses the journal; the ledger is never edited.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sales document status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SaleStatus {
    /// Being drafted.
    Draft,
    /// Waiting for confirmation.
    Pending,
    /// Confirmed order.
    Confirmed,
    /// Delivered.
    Completed,
    /// Cancelled.
    Cancelled,
    /// Invoiced to the customer.
    Invoiced,
    /// Invoice past due.
    Overdue,
    /// Fully paid.
    Paid,
    /// Unrecognised status, kept verbatim.
    Other(String),
}

impl SaleStatus {
    /// Parses a status, ignoring case. Unknown values become `Other`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Self::Draft,
            "PENDING" => Self::Pending,
            "CONFIRMED" => Self::Confirmed,
            "COMPLETED" => Self::Completed,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            "INVOICED" => Self::Invoiced,
            "OVERDUE" => Self::Overdue,
            "PAID" => Self::Paid,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    /// Upper-case name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "DRAFT",
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Invoiced => "INVOICED",
            Self::Overdue => "OVERDUE",
            Self::Paid => "PAID",
            Self::Other(s) => s,
        }
    }

    /// Only invoiced and paid sales carry journal entries.
    #[must_use]
    pub fn allows_posting(&self) -> bool {
        matches!(self, Self::Invoiced | Self::Paid)
    }
}

impl From<String> for SaleStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SaleStatus> for String {
    fn from(value: SaleStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase document status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PurchaseStatus {
    /// Being drafted.
    Draft,
    /// Submitted.
    Pending,
    /// Waiting for an approver.
    PendingApproval,
    /// Approved.
    Approved,
    /// Goods received.
    Completed,
    /// Fully paid.
    Paid,
    /// Cancelled.
    Cancelled,
    /// Unrecognised status, kept verbatim.
    Other(String),
}

impl PurchaseStatus {
    /// Parses a status, ignoring case. Unknown values become `Other`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "DRAFT" => Self::Draft,
            "PENDING" => Self::Pending,
            "PENDING_APPROVAL" => Self::PendingApproval,
            "APPROVED" => Self::Approved,
            "COMPLETED" => Self::Completed,
            "PAID" => Self::Paid,
            "CANCELLED" | "CANCELED" => Self::Cancelled,
            _ => Self::Other(s.trim().to_string()),
        }
    }

    /// Upper-case name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "DRAFT",
            Self::Pending => "PENDING",
            Self::PendingApproval => "PENDING_APPROVAL",
            Self::Approved => "APPROVED",
            Self::Completed => "COMPLETED",
            Self::Paid => "PAID",
            Self::Cancelled => "CANCELLED",
            Self::Other(s) => s,
        }
    }

    /// Approved, completed and paid purchases carry journal entries.
    #[must_use]
    pub fn allows_posting(&self) -> bool {
        matches!(self, Self::Approved | Self::Completed | Self::Paid)
    }
}

impl From<String> for PurchaseStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<PurchaseStatus> for String {
    fn from(value: PurchaseStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with the ledger after a document's status changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingDecision {
    /// Post a new journal.
    Create,
    /// Reverse the existing journal.
    Reverse,
    /// Reverse the existing journal and post the current document.
    Repost,
    /// Leave the ledger alone.
    Skip,
}

impl PostingDecision {
    /// Decides the ledger action for a status transition.
    ///
    /// # Arguments
    /// * `was_postable` - whether the previous status allowed posting
    /// * `is_postable` - whether the new status allows posting
    /// * `has_journal` - whether a live journal already exists for the document
    #[must_use]
    pub const fn on_transition(was_postable: bool, is_postable: bool, has_journal: bool) -> Self {
        match (was_postable, is_postable, has_journal) {
            (_, true, false) => Self::Create,
            (false, true, true) | (true, false, false) | (false, false, _) => Self::Skip,
            (true, false, true) => Self::Reverse,
            (true, true, true) => Self::Repost,
        }
    }
}
